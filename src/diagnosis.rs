// ---------------------------------------------------------------------------
// Diagnosis resolver – fixed class enumeration, total lookup
// ---------------------------------------------------------------------------

/// Number of diagnostic classes in the fixed enumeration.
/// Also the modulus used when the balance guard fabricates a second class.
pub const NUM_CLASSES: i64 = 4;

/// Resolve a classifier output code to its diagnostic label.
///
/// Total function: the model may emit any integer (early experimentation,
/// augmentation artifacts), so anything outside the enumeration resolves to
/// "Unknown" instead of crashing the reporting path.
pub fn resolve(code: i64) -> &'static str {
    match code {
        0 => "Normal",
        1 => "Epilepsy",
        2 => "Schizophrenia",
        3 => "Insomnia",
        _ => "Unknown",
    }
}

/// One-sentence clinical blurb per diagnosis, for the text summary.
pub fn describe(diagnosis: &str) -> &'static str {
    match diagnosis {
        "Normal" => "Brain activity within normal parameters.",
        "Epilepsy" => "Patterns compatible with epileptic activity were identified.",
        "Schizophrenia" => "The EEG signal suggests activity related to thought disorders.",
        "Insomnia" => "The EEG signal indicates alterations characteristic of insomnia.",
        _ => "The diagnosis could not be determined with precision.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve_to_fixed_names() {
        assert_eq!(resolve(0), "Normal");
        assert_eq!(resolve(1), "Epilepsy");
        assert_eq!(resolve(2), "Schizophrenia");
        assert_eq!(resolve(3), "Insomnia");
    }

    #[test]
    fn out_of_range_codes_resolve_to_unknown() {
        assert_eq!(resolve(4), "Unknown");
        assert_eq!(resolve(99), "Unknown");
        assert_eq!(resolve(-1), "Unknown");
        assert_eq!(resolve(i64::MIN), "Unknown");
    }

    #[test]
    fn every_class_has_a_description() {
        for code in 0..NUM_CLASSES {
            assert!(!describe(resolve(code)).is_empty());
        }
        assert_eq!(
            describe("Unknown"),
            "The diagnosis could not be determined with precision."
        );
    }
}
