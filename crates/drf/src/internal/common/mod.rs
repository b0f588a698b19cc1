#[macro_use]
pub(crate) mod trace;

pub(crate) mod error;
pub(crate) mod ids;

use fxhash::FxBuildHasher;

pub type Map<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
pub type Set<T> = hashbrown::HashSet<T, FxBuildHasher>;
