//! Canned analysis text used whenever generated text is unavailable.

use crate::prompt::format_percent;
use common::DetailedAnalysis;

const GENERAL_CARE: &str = "General care recommendations:
• Keep the affected area clean and dry
• Avoid harsh soaps or irritating products
• Do not scratch or pick at the area
• Monitor for changes in appearance
• Seek professional medical advice for proper diagnosis and treatment";

const DISCLAIMER: &str = "⚠️ IMPORTANT MEDICAL DISCLAIMER:
• This AI analysis is for educational purposes only
• Results should NOT be used for self-diagnosis or treatment
• Always consult a qualified healthcare provider for medical advice
• AI detection may have false positives or miss important details
• Some serious conditions may appear similar to benign ones
• Early professional consultation is recommended for all skin concerns";

const ACTION_PLAN: &str = "Recommended action plan:
1. Save these results for your medical consultation
2. Schedule an appointment with a dermatologist or healthcare provider within 1-2 weeks
3. Monitor the area daily for any changes (size, color, texture, symptoms)
4. Take additional photos to track progression
5. Avoid self-treatment until professional evaluation
6. Seek immediate medical attention if you notice rapid changes, bleeding, or severe symptoms";

/// Template-based analysis. Same input, same bytes out.
pub fn canned_analysis(condition: &str, basic_advice: &str, confidence: f32) -> DetailedAnalysis {
    let overview = format!(
        "The AI analysis indicates a possible case of {}. This is a preliminary assessment based on visual pattern recognition and should not be considered a definitive medical diagnosis. {} is a skin condition that may require professional medical evaluation for proper identification and treatment planning.",
        condition,
        capitalize(condition)
    );

    let detection_details = format!(
        "The AI model analyzed visual features in the uploaded image and identified patterns consistent with {} with a confidence level of {}%. The detection algorithm evaluated factors such as texture, color patterns, and morphological characteristics. Please note that AI detection has limitations and cannot replace clinical examination by a healthcare professional.",
        condition,
        format_percent(confidence)
    );

    let recommendations = if basic_advice.trim().is_empty() {
        GENERAL_CARE.to_string()
    } else {
        format!("{}\n\n{}", basic_advice, GENERAL_CARE)
    };

    DetailedAnalysis {
        overview,
        detection_details,
        recommendations,
        important_notes: DISCLAIMER.to_string(),
        next_steps: ACTION_PLAN.to_string(),
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
