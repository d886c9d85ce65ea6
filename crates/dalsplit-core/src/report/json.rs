//! JSON output

use serde::Serialize;

use super::{Presenter, ReportData, ReportError, ReportImage};
use crate::calc::DerivedRecord;
use crate::input::ReportMeta;

/// Writes `{ "meta": ..., "record": ..., "data": ... }` as pretty JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPresenter;

#[derive(Serialize)]
struct JsonReport<'a> {
    meta: &'a ReportMeta,
    record: &'a DerivedRecord,
    data: ReportData,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl Presenter for JsonPresenter {
    fn render(
        &self,
        record: &DerivedRecord,
        meta: &ReportMeta,
        image: Option<&ReportImage>,
    ) -> Result<Vec<u8>, ReportError> {
        let report = JsonReport {
            meta,
            record,
            data: ReportData::new(record, meta),
            image: image
                .and_then(|img| img.source.as_ref())
                .map(|path| path.display().to_string()),
        };
        let mut bytes = serde_json::to_vec_pretty(&report)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::compute_derived;
    use chrono::NaiveDate;

    #[test]
    fn test_json_shape() {
        let record = compute_derived(1.0, 2.0, 0.5, 0.25, 0.125, 0.0).unwrap();
        let meta = ReportMeta::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let bytes = JsonPresenter.render(&record, &meta, None).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["record"]["grandTotalG"], 7.75);
        assert_eq!(value["data"]["GRAND_TOTAL"], 7.75);
        assert_eq!(value["meta"]["date"], "2024-01-01");
        assert_eq!(value["meta"]["gaadi_type"], "Khadi");
        assert!(value.get("image").is_none());
    }
}
