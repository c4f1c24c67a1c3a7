//! `proctor problems`: browse problem definitions

use anyhow::anyhow;
use colored::*;
use proctor_core::Language;
use proctor_core::grader::render_value;

use super::Context;
use crate::args::ProblemsAction;
use crate::console::CliConsole;

pub fn execute(console: &CliConsole, context: &Context, action: ProblemsAction) -> anyhow::Result<()> {
    match action {
        ProblemsAction::List => list(console, context),
        ProblemsAction::Show { id } => show(console, context, &id),
        ProblemsAction::Template { id, language } => template(context, &id, &language),
    }
}

fn list(console: &CliConsole, context: &Context) -> anyhow::Result<()> {
    let problems = context.loader.load_all()?;
    if problems.is_empty() {
        console.warn(&format!(
            "No problems found in {}",
            context.loader.problems_dir().display()
        ));
        return Ok(());
    }

    console.print_header("Problems");
    for problem in problems {
        println!(
            "  {:<20} {} {}",
            problem.id.cyan().bold(),
            problem.title,
            format!("({} cases)", problem.cases.len()).dimmed()
        );
    }
    Ok(())
}

fn show(console: &CliConsole, context: &Context, id: &str) -> anyhow::Result<()> {
    let problem = context.problem(id)?;

    console.print_header(&problem.title);
    println!("{}", problem.statement.trim_end());
    println!();
    println!(
        "{} {}({})",
        "Entry point:".bold(),
        problem.entry_point,
        problem.params.join(", ")
    );
    println!("{}", "Tests:".bold());
    for (index, case) in problem.cases.iter().enumerate() {
        let args: Vec<String> = case.input.iter().map(render_value).collect();
        println!(
            "  {}. ({}) => {}",
            index + 1,
            args.join(", "),
            render_value(&case.expected)
        );
    }

    let languages: Vec<&str> = problem.starters.keys().map(Language::as_str).collect();
    if !languages.is_empty() {
        println!("{} {}", "Starters:".bold(), languages.join(", "));
    }
    Ok(())
}

fn template(context: &Context, id: &str, language: &str) -> anyhow::Result<()> {
    let language: Language = language.parse()?;
    let problem = context.problem(id)?;
    let starter = problem
        .starter(language)
        .ok_or_else(|| anyhow!("problem '{}' has no {} starter", problem.id, language))?;
    print!("{}", starter);
    Ok(())
}
