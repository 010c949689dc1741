// Shared prompt fragments. Each feature module keeps its own prompts.rs alongside it.

/// Appended to every system prompt: the reply is decoded as one JSON object.
pub const JSON_ONLY_SYSTEM: &str = "\
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Never add fields that are not in the schema.";

/// Fills `<placeholder>` slots by plain substitution in a single pass over the template.
/// Substituted values are never scanned for slots. Unknown slots are left untouched.
pub fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = slots.iter().find_map(|(slot, value)| {
            tail.strip_prefix('<')
                .and_then(|t| t.strip_prefix(*slot))
                .and_then(|t| t.strip_prefix('>'))
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
