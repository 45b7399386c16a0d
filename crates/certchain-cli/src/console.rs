use std::io::{BufRead, Write};

use anyhow::Result;
use certchain_registry::{
    issue::{DATE_FORMAT, DEFAULT_REMARKS},
    Block, CertificateRecord, Grade, IssueRequest, LookupOutcome, Registry, RegistryError,
};
use chrono::Local;
use colored::Colorize;
use serde_json::json;

use crate::cli::OutputFormat;

const HELP: &str = "\
Commands:
  issue            issue a certificate (prompts for each field)
  mine             seal pending certificates into a new block
  verify <id>      look a certificate up by id
  pending          list certificates awaiting the next block
  dashboard        pending set, mined total and grade distribution
  chain            show every block
  validate         check hash links and proofs
  help             show this message
  quit             leave the console";

/// Entered at the remarks prompt to issue a certificate without remarks.
const NO_REMARKS: &str = "-";

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented admin console over a registry.
pub struct Console<'a, R, W> {
    registry: &'a Registry,
    input: R,
    output: W,
    format: OutputFormat,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(registry: &'a Registry, input: R, output: W, format: OutputFormat) -> Self {
        Self {
            registry,
            input,
            output,
            format,
        }
    }

    /// Read and execute commands until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{}", "certchain admin console".bold())?;
        writeln!(self.output, "Type {} for a list of commands.", "help".cyan())?;
        loop {
            write!(self.output, "{} ", "certchain>".green())?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                break;
            };
            if let Flow::Quit = self.execute(line.trim())? {
                break;
            }
        }
        Ok(())
    }

    fn execute(&mut self, line: &str) -> Result<Flow> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let result = match command {
            "" => Ok(()),
            "issue" => self.issue(),
            "mine" => self.mine(),
            "verify" => self.verify(rest),
            "pending" => self.pending(),
            "dashboard" => self.dashboard(),
            "chain" => self.chain(),
            "validate" => self.validate(),
            "help" => writeln!(self.output, "{HELP}").map_err(Into::into),
            "quit" | "exit" => return Ok(Flow::Quit),
            other => {
                writeln!(self.output, "{} unknown command {other:?}, try {}", "✗".red(), "help".cyan())?;
                Ok(())
            }
        };

        // Registry failures are reported and the console keeps going.
        if let Err(e) = result {
            match e.downcast::<RegistryError>() {
                Ok(e) => writeln!(self.output, "{} {e}", "✗".red().bold())?,
                Err(e) => return Err(e),
            }
        }
        Ok(Flow::Continue)
    }

    fn issue(&mut self) -> Result<()> {
        let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
        let fields = [
            ("Student name", None),
            ("Certificate ID", None),
            ("Course", None),
            ("Institution", None),
            ("Date", Some(today.as_str())),
            ("Remarks (- for none)", Some(DEFAULT_REMARKS)),
            ("Grade (A+, A, B+, B, C, D)", Some("A+")),
        ];

        let mut answers = Vec::with_capacity(fields.len());
        for (label, default) in fields {
            match self.prompt(label, default)? {
                Some(answer) => answers.push(answer),
                None => return Ok(()),
            }
        }
        let [name, cert_id, course, institution, date, remarks, grade]: [String; 7] = answers
            .try_into()
            .map_err(|_| anyhow::anyhow!("incomplete certificate form"))?;

        let grade = if grade.is_empty() {
            None
        } else {
            match grade.parse::<Grade>() {
                Ok(grade) => Some(grade),
                Err(e) => {
                    writeln!(self.output, "{} {e}", "✗".red().bold())?;
                    return Ok(());
                }
            }
        };

        let remarks = if remarks.is_empty() {
            None
        } else if remarks == NO_REMARKS {
            Some(String::new())
        } else {
            Some(remarks)
        };

        let request = IssueRequest {
            name,
            cert_id,
            course,
            institution,
            date: Some(date),
            remarks,
            grade,
        };
        let outcome = self.registry.issue(request)?;

        match self.format {
            OutputFormat::Json => {
                let document = match &outcome.document {
                    Ok(doc) => json!({ "path": doc.path, "verification_url": doc.verification_url }),
                    Err(e) => json!({ "error": e }),
                };
                let value = json!({
                    "receipt": outcome.receipt,
                    "certificate": outcome.certificate,
                    "document": document,
                });
                writeln!(self.output, "{}", serde_json::to_string_pretty(&value)?)?;
            }
            OutputFormat::Text => {
                writeln!(
                    self.output,
                    "{} Certificate {} added, will be sealed into block {}",
                    "✓".green().bold(),
                    outcome.certificate.cert_id.to_string().yellow(),
                    outcome.receipt.block_index
                )?;
                match &outcome.document {
                    Ok(doc) => {
                        writeln!(self.output, "  PDF: {}", doc.path.display())?;
                        writeln!(self.output, "  Verify at: {}", doc.verification_url.blue())?;
                    }
                    Err(e) => writeln!(self.output, "  {} PDF not written: {e}", "!".yellow())?,
                }
            }
        }
        Ok(())
    }

    fn mine(&mut self) -> Result<()> {
        writeln!(self.output, "Searching for a proof...")?;
        let block = self.registry.mine()?;
        match self.format {
            OutputFormat::Json => self.print_json(&block)?,
            OutputFormat::Text => writeln!(
                self.output,
                "{} Block {} mined with proof {} ({} certificates)",
                "✓".green().bold(),
                block.index.to_string().yellow(),
                block.proof,
                block.len()
            )?,
        }
        Ok(())
    }

    fn verify(&mut self, cert_id: &str) -> Result<()> {
        if cert_id.is_empty() {
            writeln!(self.output, "usage: verify <cert_id>")?;
            return Ok(());
        }
        let outcome = self.registry.verify(cert_id)?;

        if self.format == OutputFormat::Json {
            let block_index = match &outcome {
                LookupOutcome::Mined { block_index, .. } => Some(*block_index),
                _ => None,
            };
            let value = json!({
                "status": outcome.status(),
                "block_index": block_index,
                "certificate": outcome.certificate(),
            });
            return self.print_json(&value);
        }

        match &outcome {
            LookupOutcome::Mined {
                block_index,
                certificate,
            } => {
                writeln!(
                    self.output,
                    "{} Certificate found in blockchain (block {block_index})",
                    "✓".green().bold()
                )?;
                self.print_certificate(certificate)?;
            }
            LookupOutcome::Pending { certificate } => {
                writeln!(self.output, "{} Certificate is pending (not yet mined)", "…".yellow().bold())?;
                self.print_certificate(certificate)?;
            }
            LookupOutcome::NotFound => {
                writeln!(self.output, "{} Certificate not found", "✗".red().bold())?;
            }
        }
        Ok(())
    }

    fn pending(&mut self) -> Result<()> {
        let pending = self.registry.pending()?;
        if self.format == OutputFormat::Json {
            return self.print_json(&pending);
        }
        if pending.is_empty() {
            writeln!(self.output, "No pending certificates.")?;
        }
        for cert in &pending {
            self.print_summary(cert)?;
        }
        Ok(())
    }

    fn dashboard(&mut self) -> Result<()> {
        let dashboard = self.registry.dashboard()?;
        if self.format == OutputFormat::Json {
            return self.print_json(&dashboard);
        }

        writeln!(self.output, "{} ({})", "Pending certificates".bold(), dashboard.pending.len())?;
        for cert in &dashboard.pending {
            self.print_summary(cert)?;
        }
        writeln!(self.output, "{} {}", "Total mined:".bold(), dashboard.total_mined)?;
        if !dashboard.grade_distribution.is_empty() {
            writeln!(self.output, "{}", "Grade distribution".bold())?;
            for (grade, count) in &dashboard.grade_distribution {
                writeln!(self.output, "  {:<3} {:>4} {}", grade.as_str(), count, "#".repeat(*count).cyan())?;
            }
        }
        Ok(())
    }

    fn chain(&mut self) -> Result<()> {
        let chain = self.registry.chain()?;
        if self.format == OutputFormat::Json {
            return self.print_json(&chain);
        }
        for block in &chain {
            self.print_block(block)?;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        let report = self.registry.validate()?;
        if self.format == OutputFormat::Json {
            return self.print_json(&report);
        }
        match &report.error {
            None => writeln!(
                self.output,
                "{} Chain valid: {} blocks, {} certificates sealed, {} pending",
                "✓".green().bold(),
                report.block_count,
                report.certificate_count,
                report.pending_count
            )?,
            Some(e) => writeln!(self.output, "{} Chain invalid: {e}", "✗".red().bold())?,
        }
        Ok(())
    }

    fn print_block(&mut self, block: &Block) -> Result<()> {
        writeln!(
            self.output,
            "{}  proof {}  prev {}  {}",
            format!("Block {}", block.index).yellow().bold(),
            block.proof,
            block.previous_hash.dimmed(),
            block.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        for cert in &block.transactions {
            self.print_summary(cert)?;
        }
        Ok(())
    }

    fn print_summary(&mut self, cert: &CertificateRecord) -> Result<()> {
        writeln!(
            self.output,
            "  {}  {}  {}  {}",
            cert.cert_id.to_string().yellow(),
            cert.name,
            cert.course,
            cert.grade
        )?;
        Ok(())
    }

    fn print_certificate(&mut self, cert: &CertificateRecord) -> Result<()> {
        for (label, value) in [
            ("Name", cert.name.as_str()),
            ("Certificate ID", cert.cert_id.as_str()),
            ("Course", cert.course.as_str()),
            ("Institution", cert.institution.as_str()),
            ("Date", cert.date.as_str()),
            ("Grade", cert.grade.as_str()),
            ("Remarks", cert.remarks.as_str()),
        ] {
            writeln!(self.output, "  {:<15} {value}", format!("{label}:"))?;
        }
        Ok(())
    }

    fn print_json<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        writeln!(self.output, "{}", serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    fn prompt(&mut self, label: &str, default: Option<&str>) -> Result<Option<String>> {
        match default {
            Some(default) => write!(self.output, "{label} [{}]: ", default.dimmed())?,
            None => write!(self.output, "{label}: ")?,
        }
        self.output.flush()?;
        Ok(self.read_line()?.map(|line| line.trim().to_string()))
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
