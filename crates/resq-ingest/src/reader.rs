//! Streaming ODM reader built on `quick-xml`'s pull parser.
//!
//! Only the parts of the export the flattening needs are kept: study global
//! variables, item definitions of the primary metadata section, and the
//! subject/event/form/item hierarchy of every clinical-data section.

use std::path::Path;
use std::time::Instant;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use resq_model::{FormSubmission, ItemValue, SubjectRecord};
use tracing::debug;

use crate::document::{ClinicalData, OdmDocument, RawItemDef, StudyDef};
use crate::error::{IngestError, Result};

/// Read and parse an ODM export from disk.
pub fn read_odm(path: &Path) -> Result<OdmDocument> {
    let start = Instant::now();
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_odm(&bytes)?;
    debug!(
        path = %path.display(),
        study_count = document.studies.len(),
        item_def_count = document.item_defs.len(),
        subject_count = document.subject_total(),
        duration_ms = start.elapsed().as_millis(),
        "odm document loaded"
    );
    Ok(document)
}

/// Parse an ODM export held in memory.
pub fn parse_odm(xml: &[u8]) -> Result<OdmDocument> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut builder = OdmBuilder::default();
    let mut buf = Vec::new();

    loop {
        let position = to_position(reader.buffer_position());
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => builder.start(e, position)?,
            Ok(Event::Empty(ref e)) => {
                builder.start(e, position)?;
                let name = e.name();
                builder.end(local_name(name.as_ref()));
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                builder.end(local_name(name.as_ref()));
            }
            Ok(Event::Text(ref e)) if builder.wants_text() => {
                let text = e
                    .unescape()
                    .map_err(|error| IngestError::xml(position, error))?;
                builder.text(&text);
            }
            Ok(Event::Eof) => {
                let eof = to_position(reader.buffer_position());
                return builder.finish(eof);
            }
            Err(error) => {
                return Err(IngestError::xml(to_position(reader.error_position()), error));
            }
            _ => {}
        }
        buf.clear();
    }
}

#[derive(Debug, Clone, Copy)]
enum TextTarget {
    StudyName,
    ProtocolName,
}

#[derive(Default)]
struct OdmBuilder {
    document: OdmDocument,
    seen_root: bool,
    root_closed: bool,
    metadata_seen: bool,
    in_primary_metadata: bool,
    study: Option<StudyDef>,
    text_target: Option<TextTarget>,
    clinical: Option<ClinicalData>,
    subject: Option<SubjectRecord>,
    event_start: Option<String>,
    event_end: Option<String>,
    form: Option<FormSubmission>,
}

impl OdmBuilder {
    fn start(&mut self, e: &BytesStart<'_>, position: u64) -> Result<()> {
        let name = e.name();
        let local = local_name(name.as_ref());

        if !self.seen_root {
            if local != b"ODM" {
                return Err(IngestError::NotOdm {
                    root: String::from_utf8_lossy(local).into_owned(),
                });
            }
            self.seen_root = true;
            return Ok(());
        }

        match local {
            b"Study" => {
                let oid = required(e, "Study", "OID", position)?;
                self.study = Some(StudyDef {
                    oid,
                    ..StudyDef::default()
                });
            }
            b"StudyName" if self.study.is_some() => {
                self.text_target = Some(TextTarget::StudyName);
            }
            b"ProtocolName" if self.study.is_some() => {
                self.text_target = Some(TextTarget::ProtocolName);
            }
            b"MetaDataVersion" if !self.metadata_seen => {
                self.metadata_seen = true;
                self.in_primary_metadata = true;
            }
            b"ItemDef" if self.in_primary_metadata => {
                let oid = required(e, "ItemDef", "OID", position)?;
                let name = required(e, "ItemDef", "Name", position)?;
                let comment = attribute(e, b"Comment", position)?.filter(|c| !c.is_empty());
                self.document
                    .item_defs
                    .push(RawItemDef { oid, name, comment });
            }
            b"ClinicalData" => {
                let study_id = required(e, "ClinicalData", "StudyOID", position)?;
                self.clinical = Some(ClinicalData {
                    study_id,
                    subjects: Vec::new(),
                });
            }
            b"SubjectData" => {
                let Some(clinical) = self.clinical.as_ref() else {
                    return Ok(());
                };
                let subject_id = match attribute(e, b"StudySubjectID", position)? {
                    Some(id) => id,
                    None => required(e, "SubjectData", "SubjectKey", position)?,
                };
                self.subject = Some(SubjectRecord::new(clinical.study_id.clone(), subject_id));
            }
            b"StudyEventData" if self.subject.is_some() => {
                self.event_start = attribute(e, b"StartDate", position)?.filter(|d| !d.is_empty());
                self.event_end = attribute(e, b"EndDate", position)?.filter(|d| !d.is_empty());
            }
            b"FormData" => {
                let Some(subject) = self.subject.as_ref() else {
                    return Ok(());
                };
                let form_oid = required(e, "FormData", "FormOID", position)?;
                self.form = Some(FormSubmission {
                    subject_id: subject.subject_id.clone(),
                    study_id: subject.study_id.clone(),
                    form_oid,
                    start_date: self.event_start.clone(),
                    end_date: self.event_end.clone(),
                    items: Vec::new(),
                });
            }
            b"ItemData" => {
                if self.form.is_none() {
                    return Ok(());
                }
                let item_id = required(e, "ItemData", "ItemOID", position)?;
                let value = attribute(e, b"Value", position)?.unwrap_or_default();
                if let Some(form) = self.form.as_mut() {
                    form.items.push(ItemValue { item_id, value });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, local: &[u8]) {
        match local {
            b"ODM" => self.root_closed = true,
            b"StudyName" | b"ProtocolName" => self.text_target = None,
            b"MetaDataVersion" => self.in_primary_metadata = false,
            b"Study" => {
                if let Some(study) = self.study.take() {
                    self.document.studies.push(study);
                }
            }
            b"StudyEventData" => {
                self.event_start = None;
                self.event_end = None;
            }
            b"FormData" => {
                if let (Some(form), Some(subject)) = (self.form.take(), self.subject.as_mut()) {
                    subject.submissions.push(form);
                }
            }
            b"SubjectData" => {
                if let (Some(subject), Some(clinical)) = (self.subject.take(), self.clinical.as_mut())
                {
                    clinical.subjects.push(subject);
                }
            }
            b"ClinicalData" => {
                if let Some(clinical) = self.clinical.take() {
                    self.document.clinical_data.push(clinical);
                }
            }
            _ => {}
        }
    }

    fn wants_text(&self) -> bool {
        self.text_target.is_some()
    }

    fn text(&mut self, text: &str) {
        let (Some(target), Some(study)) = (self.text_target, self.study.as_mut()) else {
            return;
        };
        match target {
            TextTarget::StudyName => study.name.push_str(text),
            TextTarget::ProtocolName => study.protocol_name.push_str(text),
        }
    }

    /// Anything still open at end of input means the export was cut off.
    fn finish(self, eof: u64) -> Result<OdmDocument> {
        if !self.seen_root {
            return Err(IngestError::xml(0, "document has no root element"));
        }
        let unclosed = [
            ("FormData", self.form.is_some()),
            ("SubjectData", self.subject.is_some()),
            ("ClinicalData", self.clinical.is_some()),
            ("Study", self.study.is_some()),
            ("ODM", !self.root_closed),
        ]
        .into_iter()
        .find_map(|(element, open)| open.then_some(element));
        if let Some(element) = unclosed {
            return Err(IngestError::xml(
                eof,
                format!("unexpected end of document inside <{element}>"),
            ));
        }
        if self.document.studies.is_empty() {
            return Err(IngestError::NoStudies);
        }
        Ok(self.document)
    }
}

fn required(
    e: &BytesStart<'_>,
    element: &'static str,
    attribute_name: &'static str,
    position: u64,
) -> Result<String> {
    attribute(e, attribute_name.as_bytes(), position)?.ok_or(IngestError::MissingAttribute {
        element,
        attribute: attribute_name,
        position,
    })
}

/// Value of the attribute whose local name matches, ignoring any vendor
/// namespace prefix.
fn attribute(e: &BytesStart<'_>, name: &[u8], position: u64) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|error| IngestError::xml(position, error))?;
        if local_name(attr.key.as_ref()) == name {
            let value = attr
                .unescape_value()
                .map_err(|error| IngestError::xml(position, error))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn local_name(name: &[u8]) -> &[u8] {
    // strip "prefix:" if present
    if let Some(pos) = name.iter().rposition(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

fn to_position<T: TryInto<u64>>(position: T) -> u64 {
    position.try_into().unwrap_or(u64::MAX)
}
