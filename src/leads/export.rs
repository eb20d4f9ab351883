use anyhow::Context;
use time::format_description::well_known::Rfc3339;

use crate::leads::repo_types::Lead;

const HEADER: [&str; 6] = ["Name", "Email", "Phone", "Role", "BirthDate", "CreatedAt"];

/// Renders leads as CSV, one row per lead, quoting fields as needed.
pub fn render_csv(leads: &[Lead]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADER).context("write csv header")?;
    for lead in leads {
        let created_at = lead.created_at.format(&Rfc3339).context("format created_at")?;
        wtr.write_record([
            lead.full_name.as_str(),
            lead.email.as_str(),
            lead.phone.as_str(),
            lead.role.as_str(),
            lead.birth_date.as_str(),
            created_at.as_str(),
        ])
        .with_context(|| format!("write csv row for lead {}", lead.id))?;
    }
    let bytes = wtr.into_inner().context("flush csv writer")?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}
