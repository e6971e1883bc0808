//! Prompt sent to the upstream model.

use std::fmt::Write as _;

use swipecity_game::Answer;

const PREAMBLE: &str = "You are a relocation expert helping someone find their perfect city to live in. \
Based on their preferences below, recommend ONE specific city and country that best matches their lifestyle.

USER PREFERENCES:
";

const INSTRUCTIONS: &str = r#"
INSTRUCTIONS:
1. Analyze all preferences holistically
2. Recommend ONE specific city and country
3. Provide a personalized explanation (2-3 sentences) of why this city matches their preferences
4. Consider climate, lifestyle, culture, cost of living, and all other factors they mentioned
5. Be specific and practical in your recommendation

Respond ONLY with valid JSON in this exact format:
{
  "city": "City Name",
  "country": "Country Name",
  "explanation": "Your personalized 2-3 sentence explanation here"
}"#;

/// Group answers by category, keeping categories in the order they first appear.
#[must_use]
pub fn group_by_category(answers: &[Answer]) -> Vec<(&str, Vec<&Answer>)> {
    let mut groups: Vec<(&str, Vec<&Answer>)> = Vec::new();
    for answer in answers {
        match groups
            .iter_mut()
            .find(|(category, _)| *category == answer.category)
        {
            Some((_, members)) => members.push(answer),
            None => groups.push((answer.category.as_str(), vec![answer])),
        }
    }
    groups
}

#[must_use]
pub fn build_prompt(answers: &[Answer]) -> String {
    let mut prompt = String::from(PREAMBLE);
    for (category, members) in group_by_category(answers) {
        let _ = writeln!(prompt, "\n{category}:");
        for answer in members {
            let _ = writeln!(prompt, "  - {}\n    Answer: {}", answer.question, answer.answer);
        }
    }
    prompt.push_str(INSTRUCTIONS);
    prompt
}
