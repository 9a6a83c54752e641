//! Numbered console listing of vacancy records

use crate::record::VacancyRecord;
use std::io::{self, Write};

/// Formats one record as a numbered block
///
/// The map link line is only present when the detail page offered one.
///
/// # Example
///
/// ```text
/// 1. Teacher of Mathematics
///   • Example High School
///   • Gender: Co-Educational
///   • Employment: Permanent, Full-time
///   • Beginning Teacher: Yes
///   • Location: 12 School Road, Hamilton
///   • Authority: State
///   • Listed: 12 Jan 2026
///   • Closes: 27 Jan 2026
///   • https://gazette.education.govt.nz/vacancies/1-maths
/// ```
pub fn format_record(index: usize, record: &VacancyRecord) -> String {
    let mut lines = vec![
        format!("{}. {}", index, record.title),
        format!("  • {}", record.school),
        format!("  • Gender: {}", record.gender),
        format!("  • Employment: {}", record.employment_type),
        format!(
            "  • Beginning Teacher: {}",
            if record.beginning_teacher_suitable { "Yes" } else { "No" }
        ),
        format!("  • Location: {}", record.address),
        format!("  • Authority: {}", record.authority),
        format!("  • Listed: {}", record.listed_date),
        format!("  • Closes: {}", record.close_date),
        format!("  • {}", record.detail_url),
    ];
    if let Some(map_url) = &record.map_url {
        lines.push(format!("  • {}", map_url));
    }
    lines.join("\n")
}

/// Writes all records, numbered from 1, separated by blank lines
pub fn write_records<W: Write>(out: &mut W, records: &[VacancyRecord]) -> io::Result<()> {
    for (i, record) in records.iter().enumerate() {
        writeln!(out, "{}\n", format_record(i + 1, record))?;
    }
    Ok(())
}

/// Prints all records to stdout
pub fn print_records(records: &[VacancyRecord]) -> io::Result<()> {
    if records.is_empty() {
        println!("No matching vacancies found.");
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_records(&mut out, records)?;
    out.flush()
}
