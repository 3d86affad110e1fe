//! CSV export of the deal collection.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::store::Deal;

/// Column header for the deal CSV export.
const HEADER: &str = "id,name,originator,amount,currency,status,submission_date,\
                      credit_score,facility_id,risk_score";

/// Exports deals to a CSV file at the given path.
///
/// Writes a header row followed by one row per deal in store order. Optional
/// fields that are unset become empty cells.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_deals_csv(deals: &[Deal], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_deals_csv(deals, buf)
}

/// Writes deals as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_deals_csv(deals: &[Deal], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for d in deals {
        wtr.write_record(&[
            d.id.clone(),
            d.name.clone(),
            d.originator.clone(),
            format!("{:.2}", d.amount),
            d.currency.clone(),
            d.status.to_string(),
            d.submission_date.clone(),
            d.credit_score.map(|s| s.to_string()).unwrap_or_default(),
            d.facility_id.clone().unwrap_or_default(),
            d.risk_score.map(|r| format!("{r:.2}")).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DealStatus, SeedSet};

    fn export(deals: &[Deal]) -> String {
        let mut buf = Vec::new();
        write_deals_csv(deals, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_lists_deal_columns() {
        let output = export(&[]);
        assert_eq!(
            output.lines().next(),
            Some(
                "id,name,originator,amount,currency,status,submission_date,\
                 credit_score,facility_id,risk_score"
            )
        );
    }

    #[test]
    fn row_count_matches_deal_count() {
        let deals = SeedSet::Demo.deals();
        let output = export(&deals);
        assert_eq!(output.lines().count(), deals.len() + 1);
    }

    #[test]
    fn optional_fields_become_empty_cells() {
        let deal = Deal {
            id: "D1000".to_string(),
            name: "Test Co, Series A".to_string(),
            originator: "Acme".to_string(),
            amount: 0.0,
            currency: "USD".to_string(),
            status: DealStatus::UnderReview,
            submission_date: "2024-03-01".to_string(),
            credit_score: None,
            facility_id: None,
            risk_score: None,
        };
        let output = export(&[deal]);
        let row = output.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "D1000,\"Test Co, Series A\",Acme,0.00,USD,Under Review,2024-03-01,,,"
        );
    }
}
