// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Name-based kernel registry.
//!
//! Kernels are keyed by `(shape, name)`: the entry point a caller uses fixes
//! the shape, and the name picks the kernel within it. Names are resolved to a
//! tagged [`Kernel`] once, at registration, so dispatch is a single hash probe.
//! The registry is only mutated while an engine is being built; afterwards it
//! is shared read-only between threads.

use core::fmt;
use std::collections::HashMap;

use tracing::warn;

use crate::config::{ConfigError, KernelsSection};
use crate::error::{FerrumError, PureResult};
use crate::kernels::{self, Kernel};

/// Arity and parameter pattern of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    /// One buffer in, one out (`bB`).
    Unary,
    /// Buffer and trailing scalar (`bfB`).
    UnaryScalar,
    /// Leading scalar and buffer (`fbB`).
    ScalarUnary,
    /// Two buffers in, one out (`bbB`).
    Binary,
    /// Two buffers in, two out (`bBB`).
    BinaryPair,
    /// Buffer and two scale/shift pairs (`bffffB`).
    UnaryAffine,
    /// Two buffers and two scale/shift pairs (`bbffffB`).
    BinaryAffine,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::Unary,
        Shape::UnaryScalar,
        Shape::ScalarUnary,
        Shape::Binary,
        Shape::BinaryPair,
        Shape::UnaryAffine,
        Shape::BinaryAffine,
    ];

    /// Suffix used by the `vect_*` binding names.
    pub fn suffix(&self) -> &'static str {
        match self {
            Shape::Unary => "bB",
            Shape::UnaryScalar => "bfB",
            Shape::ScalarUnary => "fbB",
            Shape::Binary => "bbB",
            Shape::BinaryPair => "bBB",
            Shape::UnaryAffine => "bffffB",
            Shape::BinaryAffine => "bbffffB",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Public description of one registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KernelSignature {
    pub shape: Shape,
    pub name: String,
}

/// Registry of kernels keyed by shape, then name.
#[derive(Debug, Clone, Default)]
pub struct KernelRegistry {
    kernels: HashMap<Shape, HashMap<String, Kernel>>,
}

impl KernelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in vocabulary.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, kernel) in kernels::builtin() {
            registry
                .kernels
                .entry(kernel.shape())
                .or_default()
                .insert(name.to_string(), kernel);
        }
        registry
    }

    /// Registers a kernel under `name` for the kernel's own shape.
    pub fn register(&mut self, name: impl Into<String>, kernel: Kernel) -> PureResult<()> {
        let name = name.into();
        let shape = kernel.shape();
        let slot = self.kernels.entry(shape).or_default();
        if slot.contains_key(&name) {
            return Err(FerrumError::DuplicateOperation { name, shape });
        }
        slot.insert(name, kernel);
        Ok(())
    }

    /// Makes `alias` resolve to whatever `target` resolves to, under every
    /// shape `target` exists in. Returns the number of shapes aliased.
    ///
    /// Nothing is inserted unless the alias is free in all of those shapes.
    pub fn alias(&mut self, alias: &str, target: &str) -> PureResult<usize> {
        if alias != target {
            if let Some(shape) = self.kernels.iter().find_map(|(shape, slot)| {
                (slot.contains_key(target) && slot.contains_key(alias)).then_some(*shape)
            }) {
                return Err(FerrumError::DuplicateOperation {
                    name: alias.to_string(),
                    shape,
                });
            }
        }
        let mut aliased = 0;
        for slot in self.kernels.values_mut() {
            if let Some(kernel) = slot.get(target).copied() {
                slot.insert(alias.to_string(), kernel);
                aliased += 1;
            }
        }
        Ok(aliased)
    }

    /// Removes `name` from every shape. Returns the number of entries removed.
    pub fn remove(&mut self, name: &str) -> usize {
        self.kernels
            .values_mut()
            .filter_map(|slot| slot.remove(name))
            .count()
    }

    /// Applies the `[kernels]` configuration section: disabled names first,
    /// then aliases.
    pub fn configure(&mut self, section: &KernelsSection) -> Result<(), ConfigError> {
        for name in &section.disabled {
            if self.remove(name) == 0 {
                warn!(kernel = %name, "disabled kernel is not registered; ignoring");
            }
        }
        for (alias, target) in &section.aliases {
            match self.alias(alias, target) {
                Ok(0) => {
                    return Err(ConfigError::UnknownAlias {
                        alias: alias.clone(),
                        target: target.clone(),
                    })
                }
                Ok(_) => {}
                Err(_) => {
                    return Err(ConfigError::AliasConflict {
                        alias: alias.clone(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Resolves `name` for `shape`.
    pub fn resolve(&self, name: &str, shape: Shape) -> PureResult<Kernel> {
        self.kernels
            .get(&shape)
            .and_then(|slot| slot.get(name))
            .copied()
            .ok_or_else(|| FerrumError::unknown(name, shape))
    }

    pub fn contains(&self, name: &str, shape: Shape) -> bool {
        self.kernels
            .get(&shape)
            .is_some_and(|slot| slot.contains_key(name))
    }

    /// Sorted names registered for `shape`.
    pub fn names(&self, shape: Shape) -> Vec<String> {
        let mut names: Vec<String> = self
            .kernels
            .get(&shape)
            .map(|slot| slot.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Every entry, sorted by shape then name.
    pub fn signatures(&self) -> Vec<KernelSignature> {
        let mut out: Vec<KernelSignature> = self
            .kernels
            .iter()
            .flat_map(|(shape, slot)| {
                slot.keys().map(move |name| KernelSignature {
                    shape: *shape,
                    name: name.clone(),
                })
            })
            .collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.kernels.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn builtin_registry_holds_the_whole_table() {
        let registry = KernelRegistry::builtin();
        assert_eq!(registry.len(), kernels::builtin().len());
        assert!(registry.contains("add", Shape::Binary));
        assert!(!registry.contains("add", Shape::Unary));
        assert_eq!(
            registry.names(Shape::BinaryPair),
            vec!["modf".to_string(), "sincos".to_string(), "swap".to_string()]
        );
        for shape in Shape::ALL {
            assert!(!registry.names(shape).is_empty(), "no kernels for {shape}");
        }
    }

    #[test]
    fn resolution_is_shape_aware() {
        let registry = KernelRegistry::builtin();
        let Kernel::Binary(add) = registry.resolve("add", Shape::Binary).unwrap() else {
            panic!("add should resolve to a binary kernel");
        };
        assert_eq!(add(2.0, 3.0), 5.0);

        let err = registry.resolve("add", Shape::Unary).unwrap_err();
        assert!(matches!(
            err,
            FerrumError::UnknownOperation { ref name, shape: Shape::Unary } if name == "add"
        ));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = KernelRegistry::builtin();
        let err = registry
            .register("add", Kernel::Binary(|a, b| a - b))
            .unwrap_err();
        assert!(matches!(err, FerrumError::DuplicateOperation { .. }));

        registry
            .register("add", Kernel::Unary(|x| x + 1.0))
            .expect("same name under another shape is allowed");
        assert!(registry.contains("add", Shape::Unary));
    }

    #[test]
    fn aliases_follow_every_shape_of_the_target() {
        let mut registry = KernelRegistry::builtin();
        assert_eq!(registry.alias("leaky", "relu").unwrap(), 3);
        for shape in [Shape::Unary, Shape::UnaryScalar, Shape::ScalarUnary] {
            assert!(registry.contains("leaky", shape));
        }
        assert_eq!(registry.alias("nothing", "missing").unwrap(), 0);
        assert!(registry.alias("sub", "add").is_err());
    }

    #[test]
    fn conflicting_alias_leaves_no_partial_entries() {
        // `relu` lives under bB, bfB and fbB; `elu` only clashes under bfB and fbB.
        let mut registry = KernelRegistry::builtin();
        let before = registry.len();
        let err = registry.alias("elu", "relu").unwrap_err();
        assert!(matches!(
            err,
            FerrumError::DuplicateOperation { ref name, .. } if name == "elu"
        ));
        assert!(!registry.contains("elu", Shape::Unary));
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn configure_disables_then_aliases() {
        let mut registry = KernelRegistry::builtin();
        let section = KernelsSection {
            disabled: vec!["gamma".into(), "not_a_kernel".into()],
            aliases: BTreeMap::from([("plus".to_string(), "add".to_string())]),
        };
        registry.configure(&section).unwrap();
        assert!(!registry.contains("gamma", Shape::Unary));
        assert!(registry.contains("plus", Shape::Binary));

        let section = KernelsSection {
            disabled: vec!["add".into()],
            aliases: BTreeMap::from([("plus".to_string(), "add".to_string())]),
        };
        let err = KernelRegistry::builtin().configure(&section).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAlias { .. }));
    }

    #[test]
    fn signatures_are_sorted() {
        let registry = KernelRegistry::builtin();
        let signatures = registry.signatures();
        assert_eq!(signatures.len(), registry.len());
        assert!(signatures.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(signatures[0].shape, Shape::Unary);
        assert_eq!(signatures[0].name, "abs");
    }
}
