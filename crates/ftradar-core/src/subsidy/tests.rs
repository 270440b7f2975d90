use std::collections::BTreeSet;

use crate::error::RadarError;
use crate::models::Region;

use super::*;

fn params(jurisdiction: Jurisdiction, investment: f64) -> ProjectParams {
    ProjectParams {
        jurisdiction,
        sectors: BTreeSet::new(),
        technologies: BTreeSet::new(),
        investment,
        target_year: 2025,
    }
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(ToString::to_string).collect()
}

fn ids(estimates: &[SubsidyEstimate]) -> Vec<&str> {
    estimates.iter().map(|row| row.program_id.as_str()).collect()
}

#[test]
fn grant_amount_is_capped_and_non_negative() {
    for (investment, rate, cap) in [
        (0.0, 0.25, 30_000.0),
        (50_000.0, 0.25, 30_000.0),
        (200_000.0, 0.25, 30_000.0),
        (10_000.0, 0.0, 5_000.0),
        (10_000.0, 1.0, 0.0),
    ] {
        let amount = grant_amount(investment, rate, cap);
        assert_eq!(amount, (investment * rate).min(cap));
        assert!(amount >= 0.0);
    }
    assert_eq!(grant_amount(200_000.0, 0.25, 30_000.0), 30_000.0);
    assert_eq!(grant_amount(40_000.0, 0.25, 30_000.0), 10_000.0);
}

#[test]
fn annuity_with_interest_repays_more_than_principal() {
    for (principal, rate, years) in [(120_000.0, 0.03, 10), (5_000.0, 0.001, 1), (1.0e6, 0.08, 30)] {
        let payment = annuity_payment(principal, Some(rate), Some(years)).expect("defined");
        assert!(payment * f64::from(years * 12) > principal);
    }
}

#[test]
fn zero_rate_annuity_is_straight_line() {
    let payment = annuity_payment(120_000.0, Some(0.0), Some(10)).expect("defined");
    assert_eq!(payment, 1_000.0);
    assert_eq!(payment * 120.0, 120_000.0);
}

#[test]
fn annuity_without_rate_or_term_is_undefined() {
    assert_eq!(annuity_payment(10_000.0, None, Some(10)), None);
    assert_eq!(annuity_payment(10_000.0, Some(0.03), None), None);
    assert_eq!(annuity_payment(10_000.0, Some(0.03), Some(0)), None);
    assert_eq!(annuity_payment(10_000.0, Some(0.03), Some(-2)), None);
}

#[test]
fn monthly_benefit_spreads_grant_over_ten_years() {
    assert_eq!(monthly_benefit(30_000.0, None), 250.0);
    assert_eq!(monthly_benefit(0.0, None), 0.0);
    assert_eq!(monthly_benefit(1_200.0, Some(5.0)), 15.0);
}

#[test]
fn nationwide_request_in_bavaria_skips_baden_wuerttemberg_program() {
    let catalog = ProgramCatalog::builtin();
    let request = params(Jurisdiction::Region(Region::Bavaria), 100_000.0);
    let estimates = estimate_subsidies(&catalog, &request).expect("estimate");
    assert_eq!(ids(&estimates), vec!["BAFA-WP-2025", "KfW-270-2025"]);
}

#[test]
fn all_jurisdictions_request_matches_every_program_in_catalog_order() {
    let catalog = ProgramCatalog::builtin();
    let estimates = estimate_subsidies(&catalog, &params(Jurisdiction::All, 100_000.0))
        .expect("estimate");
    assert_eq!(
        ids(&estimates),
        vec!["BAFA-WP-2025", "KfW-270-2025", "Land-BW-PV-2025"]
    );
}

#[test]
fn sector_and_technology_sets_must_intersect_when_given() {
    let catalog = ProgramCatalog::builtin();
    let mut request = params(Jurisdiction::Region(Region::BadenWuerttemberg), 80_000.0);
    request.technologies = set(&["PV"]);
    request.sectors = set(&["Wohnungswirtschaft"]);
    let estimates = estimate_subsidies(&catalog, &request).expect("estimate");
    assert_eq!(ids(&estimates), vec!["KfW-270-2025", "Land-BW-PV-2025"]);

    let bw = &estimates[1];
    assert_eq!(bw.grant_amount, 8_000.0);
    assert_eq!(bw.monthly_loan_payment, None);

    request.sectors = set(&["Kommunen"]);
    let estimates = estimate_subsidies(&catalog, &request).expect("estimate");
    assert_eq!(ids(&estimates), vec!["KfW-270-2025"]);

    request.technologies = set(&["Windkraft"]);
    assert!(estimate_subsidies(&catalog, &request).expect("estimate").is_empty());
}

#[test]
fn loan_rows_carry_payment_and_no_grant() {
    let catalog = ProgramCatalog::builtin();
    let mut request = params(Jurisdiction::All, 120_000.0);
    request.technologies = set(&["Speicher"]);
    let estimates = estimate_subsidies(&catalog, &request).expect("estimate");
    assert_eq!(ids(&estimates), vec!["KfW-270-2025"]);

    let loan = &estimates[0];
    assert_eq!(loan.grant_amount, 0.0);
    assert_eq!(loan.monthly_benefit, 0.0);
    let payment = loan.monthly_loan_payment.expect("payment");
    assert!((payment - 1_158.73).abs() < 0.01, "{payment}");

    let row = loan.display_row();
    assert_eq!(row.grant_rate, "—");
    assert_eq!(row.monthly_loan_payment, "1.158,73 €");
    assert_eq!(row.technologies, "PV, Speicher");
    assert_eq!(row.instrument, "Loan");
}

#[test]
fn undefined_payment_renders_placeholder_not_nan() {
    let yaml = r"
programs:
  - id: LOAN-NO-TERM
    name: Loan without term
    agency: Test
    instrument: Kredit
    tech: [PV]
    sector: [Kommunen]
    bundeslaender: [Alle]
    loan_apr: 0.02
    source: https://example.org
";
    let catalog = ProgramCatalog::from_yaml_str(yaml).expect("catalog");
    let estimates =
        estimate_subsidies(&catalog, &params(Jurisdiction::All, 10_000.0)).expect("estimate");
    let row = estimates[0].display_row();
    assert_eq!(row.monthly_loan_payment, "—");
    assert!(!format!("{row:?}").contains("NaN"));
}

#[test]
fn invalid_project_params_are_rejected() {
    let catalog = ProgramCatalog::builtin();
    for investment in [-1.0, f64::NAN, f64::INFINITY] {
        let err = estimate_subsidies(&catalog, &params(Jurisdiction::All, investment))
            .expect_err("invalid investment");
        assert!(matches!(err, RadarError::Validation(_)));
    }
    let mut request = params(Jurisdiction::All, 1_000.0);
    request.target_year = 2031;
    assert!(matches!(
        estimate_subsidies(&catalog, &request),
        Err(RadarError::Validation(_))
    ));
}

#[test]
fn jurisdiction_parses_codes_names_and_wildcards() {
    assert_eq!("All".parse::<Jurisdiction>().expect("all"), Jurisdiction::All);
    assert_eq!("Alle".parse::<Jurisdiction>().expect("alle"), Jurisdiction::All);
    assert_eq!(
        "Baden-Württemberg".parse::<Jurisdiction>().expect("name"),
        Jurisdiction::Region(Region::BadenWuerttemberg)
    );
    assert_eq!(
        "by".parse::<Jurisdiction>().expect("code"),
        Jurisdiction::Region(Region::Bavaria)
    );
    assert!("Atlantis".parse::<Jurisdiction>().is_err());
}

#[test]
fn catalog_yaml_validation_rejects_bad_programs() {
    let template = |id_a: &str, id_b: &str, rate: &str, cap: &str| {
        format!(
            "programs:\n  - {{id: {id_a}, name: A, agency: X, instrument: Grant, jurisdictions: [All], grant_rate: {rate}, grant_cap: {cap}, source: s}}\n  - {{id: {id_b}, name: B, agency: X, instrument: Grant, jurisdictions: [BY], grant_rate: 0.1, grant_cap: 10, source: s}}\n"
        )
    };

    assert!(ProgramCatalog::from_yaml_str(&template("A", "B", "0.5", "100")).is_ok());
    for bad in [
        template("A", "A", "0.5", "100"),
        template("A", "B", "1.5", "100"),
        template("A", "B", "-0.1", "100"),
        template("A", "B", "0.5", "-1"),
    ] {
        assert!(
            matches!(ProgramCatalog::from_yaml_str(&bad), Err(RadarError::Validation(_))),
            "{bad}"
        );
    }
    assert!(matches!(
        ProgramCatalog::from_yaml_str("programs:\n  - {id: X, unknown: 1}\n"),
        Err(RadarError::Yaml(_))
    ));
}

#[test]
fn option_lists_are_sorted_and_deduplicated() {
    let catalog = ProgramCatalog::builtin();
    assert_eq!(
        catalog.jurisdiction_options(),
        vec![Jurisdiction::All, Jurisdiction::Region(Region::BadenWuerttemberg)]
    );
    assert_eq!(
        catalog.sector_options(),
        vec!["Gewerbe/Industrie", "Kommunen", "Wohnungswirtschaft"]
    );
    assert_eq!(catalog.technology_options(), vec!["PV", "Speicher", "Wärmepumpe"]);
}

#[test]
fn missing_catalog_path_falls_back_to_builtin() {
    let catalog = ProgramCatalog::resolve(None).expect("builtin");
    assert_eq!(catalog, ProgramCatalog::builtin());

    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("programs.yaml");
    assert!(matches!(
        ProgramCatalog::resolve(Some(&missing)),
        Err(RadarError::Io(_))
    ));
}
