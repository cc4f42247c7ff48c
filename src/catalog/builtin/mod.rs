//! Reference catalogs.
//!
//! One small catalog per category. They exercise every rule the engine
//! understands (costs and refunds, prerequisites, exclusions, stacking,
//! scoping, granted properties, advisory pairings) and are used by the demos
//! and the integration tests. Names and costs carry no rules authority.

mod armor;
mod shields;
mod spell_focuses;
mod weapons;

pub use armor::armor;
pub use shields::shields;
pub use spell_focuses::spell_focuses;
pub use weapons::weapons;

use crate::catalog::Catalog;
use crate::category::Category;

/// The reference catalog for `category`.
///
/// # Examples
///
/// ```rust
/// use gearforge::catalog::builtin;
/// use gearforge::Category;
///
/// for category in Category::ALL {
///     let catalog = builtin::for_category(category);
///     assert_eq!(catalog.category(), category);
///     assert!(catalog.check_integrity().is_ok());
/// }
/// ```
pub fn for_category(category: Category) -> Catalog {
    match category {
        Category::Weapon => weapons(),
        Category::Armor => armor(),
        Category::Shield => shields(),
        Category::SpellFocus => spell_focuses(),
    }
}
