use super::{every_item, Context};
use crate::outcome::Rejection;

/// Every item of each declared value must satisfy the rule's type predicate.
///
/// Scalars are checked as a one-item sequence. An empty sequence never
/// passes. Absent optional fields are skipped.
pub fn check(ctx: &Context<'_>) -> Result<(), Rejection> {
    for rule in ctx.rules {
        let Some(ty) = &rule.ty else { continue };

        let passed = match ctx.fields.get(&rule.prop) {
            None if rule.optional => continue,
            None => false,
            Some(value) => every_item(value, ty),
        };

        if !passed {
            let collection = ctx.fields.get(&rule.prop).is_some_and(|v| v.is_array());
            return Err(Rejection::Type {
                prop: rule.prop.clone(),
                collection,
            });
        }
    }
    Ok(())
}
