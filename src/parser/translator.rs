use tracing::{debug, warn};

use crate::helpers::time::{epoch_seconds, parse_date_or_rfc3339, parse_rfc3339};
use crate::observability::metrics::ExporterMetrics;
use crate::parser::record::{string_field, TokenRecord, CREATED_AT_FIELD, EXPIRES_AT_FIELD, NAME_FIELD};

/// Publish the dates of every record, in order.
pub fn translate_records(metrics: &ExporterMetrics, records: &[TokenRecord]) {
    for record in records {
        translate(metrics, record);
    }
}

/// Update the creation and expiry gauges of one token.
///
/// A record without a usable name is skipped entirely. A bad creation date
/// only skips the creation gauge, the expiry date is still processed.
pub fn translate(metrics: &ExporterMetrics, record: &TokenRecord) {
    let name = match string_field(record, NAME_FIELD) {
        Ok(name) => name,
        Err(e) => {
            warn!(error = %e, "skipping token record without a name");
            return;
        }
    };

    match string_field(record, CREATED_AT_FIELD) {
        Ok(raw) => match parse_rfc3339(raw) {
            Ok(created_at) => metrics.set_creation_date(name, epoch_seconds(&created_at)),
            Err(e) => warn!(token = name, error = %e, "error parsing creation date"),
        },
        Err(e) => warn!(token = name, error = %e, "error getting creation date"),
    }

    match string_field(record, EXPIRES_AT_FIELD) {
        Ok(raw) => match parse_date_or_rfc3339(raw) {
            Ok(expires_at) => metrics.set_expiry_date(name, epoch_seconds(&expires_at)),
            Err(e) => warn!(token = name, error = %e, "error parsing expiry date"),
        },
        // tokens without expiry come back with `expires_at: null`
        Err(e) => debug!(token = name, error = %e, "no expiry date"),
    }
}
