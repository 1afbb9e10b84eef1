use super::{every_item, Context};
use crate::outcome::Rejection;

/// Each declared value must satisfy the rule's business predicate.
///
/// A sequence passes outright when the predicate accepts the whole sequence;
/// otherwise every item is checked as in the type stage.
pub fn check(ctx: &Context<'_>) -> Result<(), Rejection> {
    for rule in ctx.rules {
        let Some(biz) = &rule.biz else { continue };

        let passed = match ctx.fields.get(&rule.prop) {
            None if rule.optional => continue,
            None => false,
            Some(value) if value.is_array() && biz.test(value) => true,
            Some(value) => every_item(value, biz),
        };

        if !passed {
            return Err(Rejection::Business {
                prop: rule.prop.clone(),
            });
        }
    }
    Ok(())
}
