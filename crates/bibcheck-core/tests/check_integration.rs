//! End-to-end checks over files on disk: aux restriction, duplicate ids and
//! the per-type rules, driven through the public API only.

use std::io::Write;

use bibcheck_core::checker::{check_file, check_str};
use bibcheck_core::{CheckConfig, Convention, ProblemKind, Report, Restriction};
use tempfile::NamedTempFile;

const THREE_ENTRIES: &str = "\
@misc{A,
  title = {First},
}
@misc{B,
  title = {Second},
}
@misc{C,
  title = {Third},
}
";

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn ids(report: &Report) -> Vec<&str> {
    report.entries.iter().map(|e| e.entry.id.as_str()).collect()
}

fn count(report: &Report, kind: ProblemKind) -> usize {
    report
        .entries
        .iter()
        .flat_map(|e| &e.problems)
        .filter(|p| p.kind == kind)
        .count()
}

#[test]
fn aux_restriction_limits_checked_entries() {
    let aux = write_temp("\\relax\n\\citation{A,C}\n");
    let bib = write_temp(THREE_ENTRIES);

    let restriction = Restriction::from_aux_file(aux.path());
    let report = check_file(bib.path(), &restriction, CheckConfig::default()).unwrap();

    assert_eq!(ids(&report), ["A", "C"]);
    assert_eq!(report.counters.entries, 3);
    // misc lacks author, howpublished and year
    assert_eq!(report.counters.missing_fields, 6);
}

#[test]
fn missing_aux_file_checks_everything() {
    let bib = write_temp(THREE_ENTRIES);
    let restriction = Restriction::from_aux_file(std::path::Path::new("/nonexistent/paper.aux"));
    let report = check_file(bib.path(), &restriction, CheckConfig::default()).unwrap();

    let full = Restriction::from_keys(["A", "B", "C"]);
    let restricted = check_str(THREE_ENTRIES, &full, CheckConfig::default());

    assert_eq!(ids(&report), ["A", "B", "C"]);
    assert_eq!(ids(&report), ids(&restricted));
    assert_eq!(report.counters, restricted.counters);
}

#[test]
fn empty_aux_file_checks_everything() {
    let aux = write_temp("\\relax\n\\bibstyle{plain}\n");
    let restriction = Restriction::from_aux_file(aux.path());
    let report = check_str(THREE_ENTRIES, &restriction, CheckConfig::default());
    assert_eq!(report.entries.len(), 3);
}

#[test]
fn duplicate_ids_flag_repeats_only() {
    let bib = "@misc{dup,\n}\n@misc{dup,\n}\n@misc{dup,\n}\n@misc{other,\n}\n";
    let report = check_str(bib, &Restriction::Unrestricted, CheckConfig::default());

    let per_entry: Vec<usize> = report
        .entries
        .iter()
        .map(|e| {
            e.problems
                .iter()
                .filter(|p| p.kind == ProblemKind::NonUniqueId)
                .count()
        })
        .collect();
    assert_eq!(per_entry, [0, 1, 1, 0]);
    assert_eq!(report.counters.non_unique_ids, 2);
}

#[test]
fn abbreviated_journal_in_one_line_article() {
    let bib = "@article{x1, author={Doe, J.}, title={A Study}, journal={Proc. Conf.}, year={2020}, volume={1}}\n";
    let report = check_str(bib, &Restriction::Unrestricted, CheckConfig::default());

    let entry = &report.entries[0];
    assert_eq!(count(&report, ProblemKind::MissingField), 0);
    assert_eq!(count(&report, ProblemKind::FlawedName), 1);
    assert_eq!(entry.problems.len(), 1);
    assert_eq!(
        entry.problems[0].message,
        "flawed name: abbreviated journal title 'Proc. Conf.'"
    );
    assert_eq!(entry.entry.title, "A Study");
    assert_eq!(entry.entry.first_author, "Doe, J.");
}

#[test]
fn proceedings_with_pages_is_wrong_type_only() {
    let bib = "@proceedings{p1, editor={Doe}, publisher={ACME}, title={Proc}, year={2020}, pages={1-10}}\n";
    let report = check_str(bib, &Restriction::Unrestricted, CheckConfig::default());

    assert_eq!(report.entries[0].problems.len(), 1);
    assert_eq!(report.counters.wrong_types, 1);
    assert_eq!(report.counters.missing_fields, 0);
}

#[test]
fn string_entries_never_checked_even_when_cited() {
    let bib = "@string{jfoo = \"J. Foo\"}\n@string{jfoo = \"J. Foo\"}\n";
    let restriction = Restriction::from_keys(["jfoo = \"J. Foo\""]);
    for restriction in [Restriction::Unrestricted, restriction] {
        let report = check_str(bib, &restriction, CheckConfig::default());
        assert!(report.entries.is_empty());
        assert_eq!(report.counters.entries, 2);
        assert_eq!(report.counters.total_problems(), 0);
    }
}

#[test]
fn counters_equal_sum_over_entries() {
    let bib = "\
@article{a1,
  author = {Roe, R.},
  journal = {Ann. Math.},
}
@proceedings{p,
  pages = {1--2},
}
@article{a1,
  title = {Again},
}
";
    let report = check_str(bib, &Restriction::Unrestricted, CheckConfig::default());
    let sum: usize = report.entries.iter().map(|e| e.problems.len()).sum();
    assert_eq!(sum, report.counters.total_problems());
    assert_eq!(
        report.counters.missing_fields,
        count(&report, ProblemKind::MissingField)
    );
    assert_eq!(report.counters.wrong_types, 1);
    assert_eq!(report.counters.flawed_names, 1);
    assert_eq!(report.counters.non_unique_ids, 1);
}

#[test]
fn biblatex_convention_changes_required_fields() {
    let bib = "@thesis{t,\n type = {phdthesis},\n author = {A},\n institution = {U},\n title = {T},\n date = {2001},\n}\n";
    let config = CheckConfig {
        convention: Convention::BibLaTeX,
        ..CheckConfig::default()
    };
    let report = check_str(bib, &Restriction::Unrestricted, config);
    assert_eq!(report.counters.total_problems(), 0);

    // BibTeX has no `thesis` row, so the entry is exempt there too.
    let report = check_str(bib, &Restriction::Unrestricted, CheckConfig::default());
    assert_eq!(report.counters.total_problems(), 0);
}

#[test]
fn missing_bibliography_is_fatal() {
    let result = check_file(
        std::path::Path::new("/nonexistent/refs.bib"),
        &Restriction::Unrestricted,
        CheckConfig::default(),
    );
    assert!(result.is_err());
}
