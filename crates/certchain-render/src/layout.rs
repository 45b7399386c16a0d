use certchain_types::{CertId, CertificateRecord};
use url::form_urlencoded;

use crate::error::RenderResult;
use crate::pdf::{Canvas, Font, RasterImage};
use crate::qr::QrMatrix;

/// Landscape A4 in points.
pub const PAGE_WIDTH: f32 = 841.89;
pub const PAGE_HEIGHT: f32 = 595.28;

/// 2 cm.
const MARGIN: f32 = 56.69;

const LOGO_SIZE: f32 = 120.0;
const SIGNATURE_WIDTH: f32 = 140.0;
const SIGNATURE_HEIGHT: f32 = 50.0;
const QR_SIZE: f32 = 100.0;

/// Optional images placed on the certificate.
#[derive(Clone, Debug, Default)]
pub struct RenderAssets {
    pub logo: Option<RasterImage>,
    pub signature: Option<RasterImage>,
}

/// The URL a certificate's QR code points at.
pub fn verification_url(base_url: &str, cert_id: &CertId) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("cert_id", cert_id.as_str())
        .finish();
    format!("{base_url}?{query}")
}

/// Lay out a certificate and serialize it as PDF bytes.
///
/// Pure: the output depends only on the arguments. Absent assets degrade the
/// page (no logo; placeholder text instead of a signature) instead of failing.
pub fn render_pdf(
    record: &CertificateRecord,
    assets: &RenderAssets,
    verification_url: &str,
) -> RenderResult<Vec<u8>> {
    let qr = QrMatrix::encode(verification_url)?;

    let mut c = Canvas::new(PAGE_WIDTH, PAGE_HEIGHT);
    let (width, height) = (c.width(), c.height());
    let center = width / 2.0;

    c.set_line_width(3.0);
    c.stroke_rect(MARGIN / 2.0, MARGIN / 2.0, width - MARGIN, height - MARGIN);

    if let Some(logo) = &assets.logo {
        c.draw_image_fit(logo, MARGIN, height - MARGIN - LOGO_SIZE, LOGO_SIZE, LOGO_SIZE);
    }

    c.draw_centred_string(Font::HelveticaBold, 32.0, center, height - MARGIN - 50.0, "Certificate of Completion");
    c.draw_centred_string(
        Font::Helvetica,
        16.0,
        center,
        height - MARGIN - 90.0,
        "This certificate is proudly presented to",
    );
    c.draw_centred_string(Font::HelveticaBold, 26.0, center, height - MARGIN - 130.0, &record.name);
    c.draw_centred_string(
        Font::Helvetica,
        16.0,
        center,
        height - MARGIN - 170.0,
        &format!("For successfully completing the course: {}", record.course),
    );
    c.draw_centred_string(
        Font::Helvetica,
        16.0,
        center,
        height - MARGIN - 200.0,
        &format!("Institution: {}", record.institution),
    );

    let details_x = MARGIN + 10.0;
    let details_y = height - MARGIN - 240.0;
    c.draw_string(Font::Helvetica, 12.0, details_x, details_y, &format!("Certificate ID: {}", record.cert_id));
    c.draw_string(Font::Helvetica, 12.0, details_x, details_y - 18.0, &format!("Grade: {}", record.grade));
    c.draw_string(Font::Helvetica, 12.0, details_x, details_y - 36.0, &format!("Date: {}", record.date));
    if !record.remarks.is_empty() {
        c.draw_string(Font::Helvetica, 12.0, details_x, details_y - 54.0, &format!("Remarks: {}", record.remarks));
    }

    let sig_x = MARGIN + 10.0;
    let sig_y = MARGIN + 50.0;
    match &assets.signature {
        Some(signature) => {
            c.draw_image_fit(signature, sig_x, sig_y, SIGNATURE_WIDTH, SIGNATURE_HEIGHT);
            c.draw_string(Font::Helvetica, 10.0, sig_x, sig_y - 12.0, "Authorized Signature");
        }
        None => c.draw_string(Font::HelveticaOblique, 10.0, sig_x, sig_y, "Signature not available"),
    }

    let qr_x = width - MARGIN - QR_SIZE;
    let qr_y = MARGIN + 50.0;
    qr.draw(&mut c, qr_x, qr_y, QR_SIZE);
    c.draw_centred_string(Font::Helvetica, 8.0, qr_x + QR_SIZE / 2.0, qr_y - 10.0, "Scan to verify");

    c.draw_centred_string(
        Font::HelveticaOblique,
        9.0,
        center,
        MARGIN / 2.0 + 10.0,
        &format!("Certificate verifiable at: {verification_url}"),
    );

    Ok(c.finish())
}
