//! Tests for the entry session

use chrono::NaiveDate;
use dalsplit_core::prelude::*;
use pretty_assertions::assert_eq;

fn session() -> Session {
    Session::new(ReportMeta::new(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()))
}

#[test]
fn test_form_entry_sequence() {
    let mut s = session();
    assert_eq!(s.record(), &DerivedRecord::default());

    s.apply_text(MeasurementField::Daal, "1.000").unwrap();
    s.apply_text(MeasurementField::Tukdi, " 2 ").unwrap();
    s.apply_text(MeasurementField::RedBlack, "0.5").unwrap();
    s.apply_text(MeasurementField::Chhala, "0.25").unwrap();
    s.apply_text(MeasurementField::Dankhal, "0.125").unwrap();
    s.apply_text(MeasurementField::Mesh14, "").unwrap();

    assert_eq!(s.record(), &compute_derived(1.0, 2.0, 0.5, 0.25, 0.125, 0.0).unwrap());
    assert_eq!(s.record().raw_sum, 3.875);
}

#[test]
fn test_rejected_edit_keeps_previous_record() {
    let mut s = session();
    s.apply_text(MeasurementField::Daal, "4").unwrap();
    let before = *s.record();

    let err = s.apply_text(MeasurementField::Daal, "four").unwrap_err();
    assert_eq!(err.field(), MeasurementField::Daal);
    assert!(s.apply(InputChange::Measurement(MeasurementField::Tukdi, -1.0)).is_err());

    assert_eq!(s.record(), &before);
    assert_eq!(s.measurements().get(MeasurementField::Tukdi), 0.0);
}

#[test]
fn test_metadata_changes_keep_record() {
    let mut s = session();
    s.apply_text(MeasurementField::Daal, "1").unwrap();
    let before = *s.record();

    s.apply(InputChange::PartyName("Shree Traders".into())).unwrap();
    s.apply(InputChange::VehicleNumber("GJ01".into())).unwrap();
    s.apply(InputChange::GaadiType(GaadiType::Poori)).unwrap();

    assert_eq!(s.record(), &before);
    assert_eq!(
        report_file_name(s.meta()),
        "2024-05-20_gj01_shree_traders_poori_gaadi.pdf"
    );
}
