use super::Context;
use crate::outcome::Rejection;

/// Required props must be present and every request key must be declared.
pub fn check(ctx: &Context<'_>) -> Result<(), Rejection> {
    let missing: Vec<String> = ctx
        .rules
        .required()
        .filter(|prop| !ctx.fields.contains_key(*prop))
        .map(str::to_string)
        .collect();

    let extra: Vec<String> = ctx
        .fields
        .keys()
        .filter(|key| !ctx.rules.declares(key.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() && extra.is_empty() {
        Ok(())
    } else {
        Err(Rejection::Presence { missing, extra })
    }
}
