use std::fmt;

use crate::config::FormVariantOids;

/// Questionnaire revision a submission was filled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormVariant {
    TransferProcedure,
    Version20,
    Version12,
    Other,
}

impl FormVariant {
    /// Reconciliation precedence, higher wins.
    pub fn precedence(self) -> u8 {
        match self {
            FormVariant::TransferProcedure => 3,
            FormVariant::Version20 => 2,
            FormVariant::Version12 => 1,
            FormVariant::Other => 0,
        }
    }

    pub fn is_legacy(self) -> bool {
        self == FormVariant::Version12
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormVariant::TransferProcedure => "transfer",
            FormVariant::Version20 => "v2.0",
            FormVariant::Version12 => "v1.2",
            FormVariant::Other => "other",
        }
    }
}

impl fmt::Display for FormVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FormVariantOids {
    pub fn classify(&self, form_oid: &str) -> FormVariant {
        if form_oid == self.transfer {
            FormVariant::TransferProcedure
        } else if form_oid == self.v2_0 {
            FormVariant::Version20
        } else if form_oid == self.v1_2 {
            FormVariant::Version12
        } else {
            FormVariant::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_default_oids() {
        let oids = FormVariantOids::default();
        assert_eq!(
            oids.classify("F_RESQV20_TRANSFER"),
            FormVariant::TransferProcedure
        );
        assert_eq!(oids.classify("F_RESQV20"), FormVariant::Version20);
        assert_eq!(oids.classify("F_RESQV12"), FormVariant::Version12);
        assert_eq!(oids.classify("F_FOLLOWUP"), FormVariant::Other);
    }

    #[test]
    fn precedence_order() {
        assert!(FormVariant::TransferProcedure.precedence() > FormVariant::Version20.precedence());
        assert!(FormVariant::Version20.precedence() > FormVariant::Version12.precedence());
        assert!(FormVariant::Version12.is_legacy());
        assert!(!FormVariant::Other.is_legacy());
    }
}
