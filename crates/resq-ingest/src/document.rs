use resq_model::SubjectRecord;

/// A `<Study>` definition with its global variables as written in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyDef {
    pub oid: String,
    pub name: String,
    pub protocol_name: String,
}

/// An `<ItemDef>` from the primary metadata section, before canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItemDef {
    pub oid: String,
    pub name: String,
    pub comment: Option<String>,
}

/// One `<ClinicalData>` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClinicalData {
    pub study_id: String,
    pub subjects: Vec<SubjectRecord>,
}

/// Parsed export. Built once, then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OdmDocument {
    pub studies: Vec<StudyDef>,
    pub item_defs: Vec<RawItemDef>,
    pub clinical_data: Vec<ClinicalData>,
}

impl OdmDocument {
    /// Subjects of one study across all of its clinical-data sections, in
    /// document order.
    pub fn subjects<'a>(&'a self, study_id: &'a str) -> impl Iterator<Item = &'a SubjectRecord> {
        self.clinical_data
            .iter()
            .filter(move |section| section.study_id == study_id)
            .flat_map(|section| section.subjects.iter())
    }

    /// Subject count per study id, ordered by first appearance.
    pub fn subject_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for section in &self.clinical_data {
            match counts.iter_mut().find(|(id, _)| *id == section.study_id) {
                Some((_, count)) => *count += section.subjects.len(),
                None => counts.push((section.study_id.clone(), section.subjects.len())),
            }
        }
        counts
    }

    pub fn subject_total(&self) -> usize {
        self.clinical_data
            .iter()
            .map(|section| section.subjects.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(study_id: &str, subjects: &[&str]) -> ClinicalData {
        ClinicalData {
            study_id: study_id.to_string(),
            subjects: subjects
                .iter()
                .map(|id| SubjectRecord::new(study_id, *id))
                .collect(),
        }
    }

    #[test]
    fn counts_merge_repeated_sections() {
        let document = OdmDocument {
            clinical_data: vec![
                section("S_B", &["1", "2"]),
                section("S_A", &["3"]),
                section("S_B", &["4"]),
            ],
            ..OdmDocument::default()
        };
        assert_eq!(
            document.subject_counts(),
            vec![("S_B".to_string(), 3), ("S_A".to_string(), 1)]
        );
        assert_eq!(document.subject_total(), 4);
        let ids: Vec<&str> = document
            .subjects("S_B")
            .map(|subject| subject.subject_id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
    }
}
