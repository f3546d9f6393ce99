//! OCI-P operations on [`crate::OciClient`]

mod group;
mod provisioning;
mod sca;
mod user;

pub use provisioning::{device_prefix, qualified_password};
pub use user::UNCLASSIFIED;

use crate::types::TableRecord;
use bwks_xml_core::Element;

/// Column texts of every `row` at any depth below `table`
pub(crate) fn table_rows(table: &Element) -> Vec<Vec<String>> {
    table
        .descendants()
        .into_iter()
        .filter(|e| e.local_name() == "row")
        .map(|row| {
            row.children()
                .filter(|c| c.local_name() == "col")
                .map(|c| c.text().unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Rows of `table` keyed by its `colHeading` texts
pub(crate) fn table_records(table: &Element) -> Vec<TableRecord> {
    let headings: Vec<String> = table
        .descendants()
        .into_iter()
        .filter(|e| e.local_name() == "colHeading")
        .map(|h| h.text().unwrap_or_default())
        .collect();
    table_rows(table)
        .into_iter()
        .map(|values| headings.iter().cloned().zip(values).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bwks_xml_core::parse;

    #[test]
    fn test_table_records_keyed_by_heading() {
        let doc = parse(
            r#"<command><userSharedCallAppearanceTable>
                <colHeading>Device Name</colHeading><colHeading>Line/Port</colHeading>
                <row><col>bcp12_bob</col><col>lp_bcp12_bob@example.com</col></row>
                <row><col>cm7_bob</col><col>lp_cm7_bob@example.com</col></row>
            </userSharedCallAppearanceTable></command>"#,
        )
        .unwrap();
        let records = table_records(doc.root());
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["Device Name"], "cm7_bob");
        assert_eq!(records[0]["Line/Port"], "lp_bcp12_bob@example.com");
    }
}
