use anyhow::bail;
use tally_core::entities::Template;
use tally_core::value::AnswerValue;

/// Parse repeated `--set question=value` pairs into typed answers.
///
/// Each value takes the shape of the question it answers: numeric questions
/// parse as numbers, multiple-choice input is comma-split, file uploads become
/// file references, everything else stays text.
pub fn parse_set_entries(
    template: &Template,
    pairs: &[String],
) -> anyhow::Result<Vec<(String, AnswerValue)>> {
    let mut entries = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let Some((question_id, raw)) = pair.split_once('=') else {
            bail!("invalid --set '{pair}': expected question=value");
        };
        let question_id = question_id.trim();
        let Some(question) = template.question(question_id) else {
            bail!(
                "unknown question '{question_id}' in template '{}'",
                template.id
            );
        };
        let value = AnswerValue::parse_for(question.question_type, raw)
            .map_err(|error| anyhow::anyhow!("invalid value for '{question_id}': {error}"))?;
        entries.push((question_id.to_string(), value));
    }
    Ok(entries)
}
