//! Recover the five sections from free-form generated text.
//!
//! A fixed keyword table, checked top to bottom, decides which section a
//! heading line opens. Heading lines are dropped; other non-blank lines are
//! appended to the open section.

use crate::fallback::canned_analysis;
use common::DetailedAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Overview,
    DetectionDetails,
    Recommendations,
    ImportantNotes,
    NextSteps,
}

impl Section {
    fn slot(self) -> usize {
        match self {
            Section::Overview => 0,
            Section::DetectionDetails => 1,
            Section::Recommendations => 2,
            Section::ImportantNotes => 3,
            Section::NextSteps => 4,
        }
    }
}

/// Priority order matters: the first matching row wins.
const SECTION_RULES: [(Section, &[&str]); 5] = [
    (Section::Overview, &["overview", "1."]),
    (Section::DetectionDetails, &["detection", "details", "2."]),
    (Section::Recommendations, &["recommendation", "3."]),
    (Section::ImportantNotes, &["important", "notes", "4."]),
    (Section::NextSteps, &["next", "steps", "5."]),
];

fn heading_of(line: &str) -> Option<Section> {
    let lowered = line.to_lowercase();
    SECTION_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(section, _)| *section)
}

/// Split `text` into sections, backfilling any empty one from the canned text.
pub fn parse_sections(
    text: &str,
    condition: &str,
    basic_advice: &str,
    confidence: f32,
) -> DetailedAnalysis {
    let mut buffers: [String; 5] = Default::default();
    let mut current: Option<Section> = None;

    for line in text.lines().map(str::trim) {
        if let Some(section) = heading_of(line) {
            current = Some(section);
            continue;
        }
        if let Some(section) = current {
            if !line.is_empty() {
                let buffer = &mut buffers[section.slot()];
                buffer.push_str(line);
                buffer.push('\n');
            }
        }
    }

    let [overview, detection_details, recommendations, important_notes, next_steps] =
        buffers.map(|buffer| buffer.trim().to_string());

    DetailedAnalysis {
        overview,
        detection_details,
        recommendations,
        important_notes,
        next_steps,
    }
    .backfill(&canned_analysis(condition, basic_advice, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_route_lines() {
        let text = "1. Overview\nAcne is common.\n\n3. Recommendations\n  Wash gently.  \nAvoid picking.\n";
        let analysis = parse_sections(text, "acne", "Use gentle cleanser", 0.85);
        let fallback = canned_analysis("acne", "Use gentle cleanser", 0.85);

        assert_eq!(analysis.overview, "Acne is common.");
        assert_eq!(analysis.recommendations, "Wash gently.\nAvoid picking.");
        assert_eq!(analysis.detection_details, fallback.detection_details);
        assert_eq!(analysis.important_notes, fallback.important_notes);
        assert_eq!(analysis.next_steps, fallback.next_steps);
    }

    #[test]
    fn test_priority_order() {
        // "Overview of next steps" matches both rows; overview is checked first.
        assert_eq!(heading_of("Overview of next steps"), Some(Section::Overview));
        assert_eq!(heading_of("## Important Notes"), Some(Section::ImportantNotes));
        assert_eq!(heading_of("DETECTION_DETAILS:"), Some(Section::DetectionDetails));
        assert_eq!(heading_of("Keep the area clean"), None);
    }

    #[test]
    fn test_text_before_first_heading_is_dropped() {
        let text = "Sure, here is the analysis.\n5. Next steps\nSee a dermatologist.";
        let analysis = parse_sections(text, "Eczema", "", 0.6);

        assert_eq!(analysis.next_steps, "See a dermatologist.");
        assert!(!analysis.overview.contains("Sure, here is"));
    }

    #[test]
    fn test_idempotent() {
        let text = "OVERVIEW\nPsoriasis is chronic.\nRECOMMENDATIONS\nPhototherapy";
        assert_eq!(
            parse_sections(text, "Psoriasis", "Topicals", 0.7),
            parse_sections(text, "Psoriasis", "Topicals", 0.7)
        );
    }

    #[test]
    fn test_empty_text_is_all_fallback() {
        let analysis = parse_sections("", "Eczema", "Moisturizers", 0.3);
        assert_eq!(analysis, canned_analysis("Eczema", "Moisturizers", 0.3));
    }
}
