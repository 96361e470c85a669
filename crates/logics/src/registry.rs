//! The process-wide logic registry
//!
//! A read-mostly name table: the built-in logics register on first
//! access; external logics may be added with [`register`]. Resolution is
//! ASCII case-insensitive.

use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tableaux::Logic;

use crate::{ModelError, ModelResult};

fn table() -> &'static RwLock<FxHashMap<String, &'static Logic>> {
    static TABLE: OnceLock<RwLock<FxHashMap<String, &'static Logic>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut map: FxHashMap<String, &'static Logic> = FxHashMap::default();
        for logic in [
            &crate::fde::LOGIC,
            &crate::k3::LOGIC,
            &crate::k3w::LOGIC,
            &crate::lp::LOGIC,
            &crate::l3::LOGIC,
            &crate::g3::LOGIC,
            &crate::rm3::LOGIC,
            &crate::mh::LOGIC,
            &crate::nh::LOGIC,
            &crate::cpl::LOGIC,
            &crate::cfol::LOGIC,
            &crate::k::LOGIC,
            &crate::d::LOGIC,
            &crate::t::LOGIC,
            &crate::s4::LOGIC,
            &crate::s5::LOGIC,
        ] {
            map.insert(logic.meta.name.to_ascii_lowercase(), logic);
        }
        RwLock::new(map)
    })
}

/// Resolve a logic by name, case-insensitively.
pub fn get(name: &str) -> ModelResult<&'static Logic> {
    table()
        .read()
        .get(&name.to_ascii_lowercase())
        .copied()
        .ok_or_else(|| ModelError::UnknownLogic(name.to_string()))
}

/// Register an externally defined logic. Refuses duplicate names.
pub fn register(logic: &'static Logic) -> ModelResult<()> {
    let key = logic.meta.name.to_ascii_lowercase();
    let mut guard = table().write();
    if guard.contains_key(&key) {
        return Err(ModelError::UnknownLogic(format!(
            "name already registered: {}",
            logic.meta.name
        )));
    }
    guard.insert(key, logic);
    Ok(())
}

/// All registered logic names, sorted by category order then name.
pub fn names() -> Vec<&'static str> {
    let guard = table().read();
    let mut logics: Vec<&'static Logic> = guard.values().copied().collect();
    logics.sort_by_key(|l| (l.meta.category, l.meta.category_order, l.meta.name));
    logics.into_iter().map(|l| l.meta.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(get("cpl").unwrap().meta.name, "CPL");
        assert_eq!(get("CPL").unwrap().meta.name, "CPL");
        assert!(get("nope").is_err());
    }

    #[test]
    fn test_all_builtins_registered() {
        for name in [
            "FDE", "K3", "K3W", "LP", "L3", "G3", "RM3", "MH", "NH", "CPL", "CFOL", "K", "D",
            "T", "S4", "S5",
        ] {
            assert!(get(name).is_ok(), "{name} missing from registry");
        }
        assert_eq!(names().len(), 16);
    }

    #[test]
    fn test_register_refuses_duplicates() {
        assert!(register(&crate::cpl::LOGIC).is_err());
    }
}
