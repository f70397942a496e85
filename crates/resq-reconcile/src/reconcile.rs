//! Per-subject selection of the authoritative form submission.

use resq_model::{FormSubmission, Row, SubjectRecord, redact_value};
use tracing::trace;

use crate::catalog::StudyCatalog;
use crate::config::FormVariantOids;
use crate::recode::LegacyRecoder;
use crate::schema::SchemaIndex;
use crate::variant::FormVariant;

/// Why a subject contributes no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The subject has no form submissions at all.
    NoSubmissions,
    /// Several submissions, none of them on a preferred revision.
    NoPreferredVariant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    Row {
        row: Row,
        variant: FormVariant,
        /// Item references missing from the schema index, dropped from the row.
        unknown_items: usize,
    },
    Skip(SkipReason),
}

impl Reconciled {
    pub fn into_row(self) -> Option<Row> {
        match self {
            Reconciled::Row { row, .. } => Some(row),
            Reconciled::Skip(_) => None,
        }
    }
}

/// Turns one subject's submissions into a single row.
///
/// Holds only shared references, so one instance serves every worker.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    index: &'a SchemaIndex,
    catalog: &'a StudyCatalog,
    variants: &'a FormVariantOids,
    recoder: &'a LegacyRecoder,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        index: &'a SchemaIndex,
        catalog: &'a StudyCatalog,
        variants: &'a FormVariantOids,
        recoder: &'a LegacyRecoder,
    ) -> Self {
        Self {
            index,
            catalog,
            variants,
            recoder,
        }
    }

    /// Pick the authoritative submission.
    ///
    /// A lone submission always wins. With several, the first transfer
    /// submission wins, then the first v2.0 one; anything else is skipped.
    pub fn select<'s>(
        &self,
        submissions: &'s [FormSubmission],
    ) -> Result<(&'s FormSubmission, FormVariant), SkipReason> {
        match submissions {
            [] => Err(SkipReason::NoSubmissions),
            [only] => Ok((only, self.variants.classify(&only.form_oid))),
            many => [FormVariant::TransferProcedure, FormVariant::Version20]
                .into_iter()
                .find_map(|wanted| {
                    many.iter()
                        .find(|submission| self.variants.classify(&submission.form_oid) == wanted)
                        .map(|submission| (submission, wanted))
                })
                .ok_or(SkipReason::NoPreferredVariant),
        }
    }

    pub fn reconcile(&self, subject: &SubjectRecord) -> Reconciled {
        let (submission, variant) = match self.select(&subject.submissions) {
            Ok(chosen) => chosen,
            Err(reason) => {
                trace!(
                    subject = %redact_value(&subject.subject_id),
                    study = %subject.study_id,
                    submissions = subject.submission_count(),
                    ?reason,
                    "subject skipped"
                );
                return Reconciled::Skip(reason);
            }
        };

        let meta = self.catalog.meta_or_placeholder(&subject.study_id);
        let mut row = Row {
            subject_id: subject.subject_id.clone(),
            protocol_id: meta.protocol_id,
            site_name: meta.display_name,
            start_date: submission.start_date.clone(),
            end_date: submission.end_date.clone(),
            form_oid: submission.form_oid.clone(),
            ..Row::default()
        };

        let mut unknown_items = 0;
        for item in &submission.items {
            let Ok(column) = self.index.canonical_name_of(&item.item_id) else {
                unknown_items += 1;
                continue;
            };
            if let Err(error) = row.set_field(column, item.value.as_str()) {
                trace!(item = %item.item_id, %error, "item dropped");
            }
        }

        if variant.is_legacy() {
            row.fields = self.recoder.recode(&row.fields);
        }

        trace!(
            subject = %redact_value(&subject.subject_id),
            study = %subject.study_id,
            %variant,
            columns = row.fields.len(),
            unknown_items,
            "subject reconciled"
        );

        Reconciled::Row {
            row,
            variant,
            unknown_items,
        }
    }
}
