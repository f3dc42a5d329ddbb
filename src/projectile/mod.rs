//! Transient projectiles and effects.

mod bullet;
mod casing;
mod explosion;
mod grenade;
mod lob;

pub use bullet::{Bullet, BulletOwner};
pub use casing::Casing;
pub use explosion::{Explosion, ExplosionKind, ExplosionSource};
pub use grenade::{Grenade, GrenadePhase};
pub use lob::{Bomb, Lob, PetrolBomb};
