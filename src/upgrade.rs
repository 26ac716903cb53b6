//! Currency-gated upgrade shop.
//!
//! Each stat key is bound to the entity that owns it when the catalog is
//! built, so a purchase never has to probe the package and shooter at
//! runtime to find where a stat lives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::Package;
use crate::error::PurchaseError;
use crate::shooter::Shooter;

pub const BASE_COST: u32 = 10;
/// Added to an entry's cost after every purchase.
pub const COST_STEP: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKey {
    MaxHp,
    Armor,
    Damage,
    MaxAmmo,
    AttackSpeed,
    ReloadSpeed,
    CritRate,
    CritDamage,
    Bounty,
}

impl StatKey {
    pub const ALL: [StatKey; 9] = [
        StatKey::MaxHp,
        StatKey::Armor,
        StatKey::Damage,
        StatKey::MaxAmmo,
        StatKey::AttackSpeed,
        StatKey::ReloadSpeed,
        StatKey::CritRate,
        StatKey::CritDamage,
        StatKey::Bounty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatKey::MaxHp => "max_hp",
            StatKey::Armor => "armor",
            StatKey::Damage => "dmg",
            StatKey::MaxAmmo => "max_ammo",
            StatKey::AttackSpeed => "attk_spd",
            StatKey::ReloadSpeed => "reload_spd",
            StatKey::CritRate => "crit_rate",
            StatKey::CritDamage => "crit_dmg",
            StatKey::Bounty => "mny_bnty",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatKey::MaxHp => "Max HP",
            StatKey::Armor => "Armor",
            StatKey::Damage => "Damage",
            StatKey::MaxAmmo => "Max Ammo",
            StatKey::AttackSpeed => "Attack Speed",
            StatKey::ReloadSpeed => "Reload Speed",
            StatKey::CritRate => "Crit Rate",
            StatKey::CritDamage => "Crit Damage",
            StatKey::Bounty => "Money Gain",
        }
    }

    fn increment(self) -> f32 {
        match self {
            StatKey::MaxHp => 10.0,
            StatKey::Armor => 1.0,
            StatKey::Damage => 10.0,
            StatKey::MaxAmmo => 1.0,
            StatKey::AttackSpeed => 0.5,
            StatKey::ReloadSpeed => 0.5,
            StatKey::CritRate => 0.01,
            StatKey::CritDamage => 0.1,
            StatKey::Bounty => 10.0,
        }
    }

    fn access(self) -> StatAccess {
        match self {
            StatKey::MaxHp => StatAccess::Package(|p, inc| bump(&mut p.max_health, inc)),
            StatKey::Armor => StatAccess::Package(|p, inc| bump(&mut p.armor, inc)),
            StatKey::Damage => StatAccess::Shooter(|s, inc| bump(&mut s.damage, inc)),
            StatKey::MaxAmmo => StatAccess::Shooter(|s, inc| bump_count(&mut s.max_ammo, inc)),
            StatKey::AttackSpeed => StatAccess::Shooter(|s, inc| bump(&mut s.attack_speed, inc)),
            StatKey::ReloadSpeed => StatAccess::Shooter(|s, inc| bump(&mut s.reload_speed, inc)),
            StatKey::CritRate => StatAccess::Shooter(|s, inc| bump(&mut s.crit_rate, inc)),
            StatKey::CritDamage => StatAccess::Shooter(|s, inc| bump(&mut s.crit_damage, inc)),
            StatKey::Bounty => StatAccess::Shooter(|s, inc| bump_count(&mut s.bounty, inc)),
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKey {
    type Err = PurchaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| PurchaseError::UnknownStat(s.to_string()))
    }
}

/// Round to the shop's two-decimal display precision.
fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

fn bump(stat: &mut f32, increment: f32) -> f32 {
    *stat = round2(*stat + increment);
    *stat
}

fn bump_count(stat: &mut u32, increment: f32) -> f32 {
    *stat = (*stat as f32 + increment).round().max(0.0) as u32;
    *stat as f32
}

/// Which entity owns a stat, and how to raise it.  Each function applies the
/// increment and returns the new value.
#[derive(Clone, Copy)]
pub enum StatAccess {
    Package(fn(&mut Package, f32) -> f32),
    Shooter(fn(&mut Shooter, f32) -> f32),
}

impl fmt::Debug for StatAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatAccess::Package(_) => f.write_str("Package"),
            StatAccess::Shooter(_) => f.write_str("Shooter"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub stat: StatKey,
    pub label: &'static str,
    pub cost: u32,
    pub increment: f32,
    access: StatAccess,
}

impl CatalogEntry {
    pub fn new(stat: StatKey, cost: u32) -> Self {
        Self {
            stat,
            label: stat.label(),
            cost,
            increment: stat.increment(),
            access: stat.access(),
        }
    }

    /// Current value of this entry's stat.
    pub fn current(&self, shooter: &Shooter, package: &Package) -> f32 {
        match self.stat {
            StatKey::MaxHp => package.max_health,
            StatKey::Armor => package.armor,
            StatKey::Damage => shooter.damage,
            StatKey::MaxAmmo => shooter.max_ammo as f32,
            StatKey::AttackSpeed => shooter.attack_speed,
            StatKey::ReloadSpeed => shooter.reload_speed,
            StatKey::CritRate => shooter.crit_rate,
            StatKey::CritDamage => shooter.crit_damage,
            StatKey::Bounty => shooter.bounty as f32,
        }
    }
}

/// Outcome of a successful purchase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Receipt {
    pub stat: StatKey,
    pub value: f32,
    pub paid: u32,
    pub next_cost: u32,
}

#[derive(Clone, Debug)]
pub struct UpgradeShop {
    entries: Vec<CatalogEntry>,
}

impl Default for UpgradeShop {
    fn default() -> Self {
        Self {
            entries: StatKey::ALL
                .into_iter()
                .map(|k| CatalogEntry::new(k, BASE_COST))
                .collect(),
        }
    }
}

impl UpgradeShop {
    /// A shop carrying only `entries`, in order.
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, stat: StatKey) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.stat == stat)
    }

    pub fn cost_of(&self, stat: StatKey) -> Option<u32> {
        self.entry(stat).map(|e| e.cost)
    }

    /// Overwrite the current cost of `stat`, e.g. when restoring a save.
    pub fn set_cost(&mut self, stat: StatKey, cost: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.stat == stat) {
            entry.cost = cost;
        }
    }

    /// Buy one step of `stat`.  On failure nothing changes and the reason is
    /// logged as well as returned.
    pub fn purchase(
        &mut self,
        stat: StatKey,
        shooter: &mut Shooter,
        package: &mut Package,
    ) -> Result<Receipt, PurchaseError> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.stat == stat) else {
            let err = PurchaseError::UnknownStat(stat.to_string());
            log::warn!("{}", err);
            return Err(err);
        };

        if shooter.wallet < entry.cost {
            let err = PurchaseError::InsufficientFunds {
                cost: entry.cost,
                wallet: shooter.wallet,
            };
            log::warn!("{}", err);
            return Err(err);
        }

        let value = match entry.access {
            StatAccess::Package(apply) => apply(package, entry.increment),
            StatAccess::Shooter(apply) => apply(shooter, entry.increment),
        };
        let paid = entry.cost;
        shooter.wallet -= paid;
        entry.cost += COST_STEP;

        log::info!("{} upgraded to {}, next cost: {}", stat, value, entry.cost);
        Ok(Receipt {
            stat,
            value,
            paid,
            next_cost: entry.cost,
        })
    }

    /// Like [`UpgradeShop::purchase`] but keyed by the stat's string name.
    pub fn purchase_named(
        &mut self,
        name: &str,
        shooter: &mut Shooter,
        package: &mut Package,
    ) -> Result<Receipt, PurchaseError> {
        let stat = name.parse::<StatKey>().map_err(|err| {
            log::warn!("{}", err);
            err
        })?;
        self.purchase(stat, shooter, package)
    }
}
