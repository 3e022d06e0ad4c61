//! Plain-text rendering of completed draws.
//!
//! The report is stable for a given draw: no timestamps, no live state, so
//! exporting twice yields identical text.

use crate::engine::ExchangeComplete;

const TITLE: &str = "Pair Draw Results";

/// Renders the result report for a completed draw.
pub(crate) fn render(complete: &ExchangeComplete) -> String {
    let mut out = String::new();

    out.push_str(TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(TITLE.len()));
    out.push_str("\n\n");

    out.push_str(&format!("Participants: {}\n", complete.roster().len()));
    out.push_str(&format!("Assignments:  {}\n", complete.assignments().len()));

    let excluded: Vec<String> = complete
        .excluded_letters()
        .map(|letter| letter.to_string())
        .collect();
    if !excluded.is_empty() {
        out.push_str(&format!("\nExcluded letters: {}\n", excluded.join(", ")));
    }

    if !complete.restrictions().is_empty() {
        out.push_str("\nRestrictions:\n");
        for restriction in complete.restrictions().iter() {
            out.push_str(&format!("  {restriction}\n"));
        }
    }

    let name_width = complete
        .assignments()
        .iter()
        .map(|a| a.drawer().len())
        .max()
        .unwrap_or(0);

    out.push_str("\nLetters:\n");
    for assignment in complete.assignments() {
        out.push_str(&format!(
            "  {:<width$} -> {}\n",
            assignment.drawer(),
            assignment.letter(),
            width = name_width,
        ));
    }

    out.push_str("\nPairings:\n");
    for (index, assignment) in complete.assignments().iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", index + 1, assignment));
    }

    let summary = complete.summary();
    out.push_str("\nSummary:\n");
    out.push_str(&format!(
        "  {:<22} {}\n",
        "Restriction overrides:",
        summary.restriction_overrides()
    ));
    out.push_str(&format!(
        "  {:<22} {}\n",
        "Self assignments:",
        summary.self_assignments()
    ));
    out.push_str(&format!(
        "  {:<22} {}\n",
        "Repeated letters:",
        summary.repeated_letters()
    ));
    out.push_str(&format!(
        "  {:<22} {}\n",
        "Exclusion overrides:",
        summary.exclusion_overrides()
    ));
    out.push_str(&format!(
        "  {:<22} {}\n",
        "Swap repairs:",
        summary.swap_repairs()
    ));

    if complete.is_degraded() {
        out.push_str("\nRules were relaxed to complete this draw.\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ExchangeSetup;
    use crate::letters::Letter;
    use crate::roster::Roster;

    fn sample() -> ExchangeComplete {
        let roster = Roster::from_names(["Alice", "Bob", "Carol", "Dave"]).unwrap();
        let mut setup = ExchangeSetup::new(roster).with_seed(13);
        setup.add_restriction("Alice", "Bob").unwrap();
        setup.set_excluded_letters([Letter::Q, Letter::X]);
        setup.assign_all()
    }

    #[test]
    fn test_report_lists_every_section() {
        let report = sample().report();

        assert!(report.starts_with("Pair Draw Results\n================="));
        assert!(report.contains("Participants: 4"));
        assert!(report.contains("Assignments:  4"));
        assert!(report.contains("Excluded letters: Q, X"));
        assert!(report.contains("Alice <-> Bob"));
        assert!(report.contains("Letters:"));
        assert!(report.contains("Pairings:"));
        assert!(report.contains("  1. "));
        assert!(report.contains("Restriction overrides:"));
    }

    #[test]
    fn test_report_is_stable_across_renders() {
        let complete = sample();
        assert_eq!(complete.report(), complete.report());
    }

    #[test]
    fn test_report_skips_empty_sections() {
        let roster = Roster::from_names(["Alice", "Bob", "Carol"]).unwrap();
        let report = ExchangeSetup::new(roster).with_seed(8).assign_all().report();

        assert!(!report.contains("Excluded letters"));
        assert!(!report.contains("Restrictions:"));
        assert!(!report.contains("relaxed"));
    }

    #[test]
    fn test_degraded_draw_is_flagged() {
        let roster = Roster::from_names(["Alice", "Bob"]).unwrap();
        let mut setup = ExchangeSetup::new(roster).with_seed(8);
        setup.add_restriction("Alice", "Bob").unwrap();

        let report = setup.assign_all().report();
        assert!(report.contains("Rules were relaxed to complete this draw."));
    }
}
