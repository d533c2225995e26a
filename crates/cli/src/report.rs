//! Terminal reporting
//!
//! Human-facing output. Results go to stdout, problems to stderr, so the
//! JSON dump stays machine-readable.

use colored::*;

use modelsql_codegen::{GeneratedProject, GenerationSummary};
use modelsql_ir::{ExtractionReport, ExtractionResult, Field, Model};

/// Print parse failures and warning diagnostics to stderr
pub fn print_problems(report: &ExtractionReport) {
    for error in &report.parse_errors {
        eprintln!("{} {}", "✗ parse error:".red().bold(), error);
    }
    for warning in report.warnings() {
        eprintln!("{} {}", "⚠".yellow(), warning);
    }
    if report.has_parse_errors() {
        eprintln!(
            "{} {} of {} file(s) could not be parsed and were skipped",
            "!".red().bold(),
            report.parse_errors.len(),
            report.files_scanned
        );
    }
}

/// Print generation warnings to stderr
pub fn print_generation_warnings(project: &GeneratedProject) {
    for warning in &project.warnings {
        eprintln!("{} {}", "⚠".yellow(), warning);
    }
}

/// Print the files written and the run summary
pub fn print_generated(summary: &GenerationSummary, project: &GeneratedProject) {
    println!("{}", "Generated files".cyan().bold());
    for file in &project.files {
        println!("  {} {}", "✓".green(), file.path.display());
    }
    println!();
    print!("{}", summary);
}

/// Print models and query fragments without writing anything
pub fn print_dry_run(report: &ExtractionReport) {
    let result = &report.result;
    println!(
        "{} {} model(s), {} query fragment(s) from {} file(s)",
        "Dry run:".cyan().bold(),
        result.model_count(),
        result.queries.len(),
        report.files_parsed()
    );

    for model in &result.models {
        println!();
        println!("{}", model_heading(model).bold());
        for field in &model.fields {
            println!("  {}", field_line(field));
        }
    }

    if !result.queries.is_empty() {
        println!();
        println!("{}", "Queries".cyan().bold());
        for fragment in &result.queries {
            for line in fragment.lines() {
                println!("  {}", line.dimmed());
            }
        }
    }
}

/// The extraction result as pretty JSON
pub fn dry_run_json(result: &ExtractionResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn model_heading(model: &Model) -> String {
    format!("{} ({})", model.name, model.table_name())
}

fn field_line(field: &Field) -> String {
    let mut line = format!("{}: {}", field.name, field.type_name);

    let mut flags = Vec::new();
    if field.nullable {
        flags.push("null");
    }
    if field.unique {
        flags.push("unique");
    }
    if !flags.is_empty() {
        line.push_str(&format!(" [{}]", flags.join(", ")));
    }

    if field.relation.is_relation() {
        let target = field.related_model.as_deref().unwrap_or("?");
        line.push_str(&format!(" -> {} {}", field.relation, target));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_line() {
        assert_eq!(field_line(&Field::new("title", "CharField")), "title: CharField");
        assert_eq!(
            field_line(&Field::new("email", "EmailField").nullable().unique()),
            "email: EmailField [null, unique]"
        );
        assert_eq!(
            field_line(&Field::foreign_key("author", "Author")),
            "author: ForeignKey -> foreign-key Author"
        );
    }

    #[test]
    fn test_model_heading() {
        assert_eq!(model_heading(&Model::new("Blog Post")), "Blog Post (blog_post)");
    }

    #[test]
    fn test_dry_run_json_is_an_extraction_result() {
        let result = ExtractionResult::new(vec![Model::new("Tag")], vec!["-- from: a.py\n-- x".into()]);
        let json = dry_run_json(&result).unwrap();
        assert_eq!(ExtractionResult::from_json(&json).unwrap(), result);
    }
}
