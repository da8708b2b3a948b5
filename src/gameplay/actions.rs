//! Discrete player intents: attacking, dashing, building, and shopping.
//!
//! A refused action (not enough wood, tier locked, bad build spot) is an ordinary outcome
//! reported through the message sink, never an error.

use bevy::log::{debug, warn};
use bevy::math::Vec2;

use super::body::EntityId;
use super::error::{SimError, SimResult};
use super::player::attack::attack_or_gather;
use super::player::skills::{self, SKILL_COUNT, SkillUpgradeBlocked};
use super::player::weapons::{UpgradeBlocked, WeaponTier, upgrade_cost};
use super::player::{MAX_DODGE_CHANCE, dodge_upgrade_cost};
use super::sim::SimulationContext;
use super::structures::{BuildBlocked, SHOP_REACH, ShopKind, Structure, StructureKind, check_build_site};

/// Seconds a rejection or confirmation stays on screen.
const ACTION_MESSAGE_SECS: f32 = 2.0;

/// One discrete request from the input layer, consumed once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    AttackInteract,
    Dash,
    Build { kind: StructureKind, at: Vec2 },
    UpgradeSkill(usize),
    UpgradeWeapon,
    UpgradeDodge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRejected {
    NotEnoughWood { need: u32, have: u32 },
    NotEnoughGold { need: u32, have: u32 },
    NotEnoughGems { need: u32, have: u32 },
    WeaponLocked { requires: WeaponTier },
    MaxLevel,
    NotAtShop(ShopKind),
    BadSite(BuildBlocked),
}

impl ActionRejected {
    #[must_use]
    pub fn message(&self) -> String {
        match *self {
            Self::NotEnoughWood { need, have } => format!("Need {need} wood (have {have})"),
            Self::NotEnoughGold { need, have } => format!("Need {need} gold (have {have})"),
            Self::NotEnoughGems { need, have } => format!("Need {need} gems (have {have})"),
            Self::WeaponLocked { requires } => {
                format!("Max out the {} first", requires.display_name())
            }
            Self::MaxLevel => "Already at max level".to_string(),
            Self::NotAtShop(ShopKind::WeaponSmith) => "Visit the weapon smith".to_string(),
            Self::NotAtShop(ShopKind::Armory) => "Visit the armory".to_string(),
            Self::BadSite(blocked) => blocked.reason().to_string(),
        }
    }
}

/// Applies one intent. Rejections go to the message sink; only a malformed intent is an
/// error.
pub fn apply_intent(ctx: &mut SimulationContext, intent: Intent, movement: Vec2) -> SimResult<()> {
    let outcome = match intent {
        Intent::AttackInteract => {
            attack_or_gather(ctx);
            Ok(None)
        }
        Intent::Dash => {
            ctx.player.try_dash(movement);
            Ok(None)
        }
        Intent::Build { kind, at } => {
            build(ctx, kind, at).map(|_| Some(format!("{} built", kind.display_name())))
        }
        Intent::UpgradeSkill(index) => {
            if index >= SKILL_COUNT {
                return Err(SimError::UnknownSkill(index));
            }
            upgrade_skill(ctx, index).map(|level| {
                let name = skills::SkillKind::ALL[index].display_name();
                Some(format!("{name} is now level {level}"))
            })
        }
        Intent::UpgradeWeapon => upgrade_weapon(ctx)
            .map(|(tier, level)| Some(format!("{} is now level {level}", tier.display_name()))),
        Intent::UpgradeDodge => {
            upgrade_dodge(ctx).map(|level| Some(format!("Dodge is now level {level}")))
        }
    };

    match outcome {
        Ok(Some(text)) => ctx.messages.set_message(text, ACTION_MESSAGE_SECS),
        Ok(None) => {}
        Err(rejected) => {
            debug!("{intent:?} rejected: {rejected:?}");
            ctx.messages.set_message(rejected.message(), ACTION_MESSAGE_SECS);
        }
    }
    Ok(())
}

/// Applies every intent in order. A malformed intent is logged and skipped.
pub fn apply_intents(ctx: &mut SimulationContext, intents: &[Intent], movement: Vec2) {
    for &intent in intents {
        if let Err(err) = apply_intent(ctx, intent, movement) {
            warn!("ignored intent {intent:?}: {err}");
        }
    }
}

fn require(need: u32, have: u32, rejection: ActionRejected) -> Result<(), ActionRejected> {
    if have < need {
        return Err(rejection);
    }
    Ok(())
}

fn require_shop(ctx: &SimulationContext, kind: ShopKind) -> Result<(), ActionRejected> {
    let player = ctx.player.body.center();
    let near = ctx
        .shops
        .iter()
        .any(|shop| shop.kind == kind && shop.body.center().distance(player) <= SHOP_REACH);
    if near { Ok(()) } else { Err(ActionRejected::NotAtShop(kind)) }
}

/// Builds a structure at the tile under `at`, paying its cost.
pub fn build(ctx: &mut SimulationContext, kind: StructureKind, at: Vec2) -> Result<EntityId, ActionRejected> {
    let cost = kind.cost();
    let (wood, gold) = (ctx.player.wood, ctx.player.gold);
    require(cost.wood, wood, ActionRejected::NotEnoughWood { need: cost.wood, have: wood })?;
    require(cost.gold, gold, ActionRejected::NotEnoughGold { need: cost.gold, have: gold })?;
    let center = check_build_site(ctx, at).map_err(ActionRejected::BadSite)?;

    ctx.player.wood -= cost.wood;
    ctx.player.gold -= cost.gold;
    let id = ctx.ids.next_id();
    ctx.structures.push(Structure::new(id, kind, center));
    debug!("built {kind:?} {id:?} at {center}");
    Ok(id)
}

/// Buys the next weapon level at the weapon smith. Returns the upgraded tier and its level.
pub fn upgrade_weapon(ctx: &mut SimulationContext) -> Result<(WeaponTier, u32), ActionRejected> {
    require_shop(ctx, ShopKind::WeaponSmith)?;
    let weapons = ctx.player.weapons;
    let tier = weapons.next_upgrade().ok_or(ActionRejected::MaxLevel)?;
    weapons.check_upgrade(tier).map_err(|blocked| match blocked {
        UpgradeBlocked::Locked { requires } => ActionRejected::WeaponLocked { requires },
        UpgradeBlocked::Maxed => ActionRejected::MaxLevel,
    })?;
    let cost = upgrade_cost(tier, weapons.level(tier));
    let gold = ctx.player.gold;
    require(cost, gold, ActionRejected::NotEnoughGold { need: cost, have: gold })?;

    ctx.player.gold -= cost;
    let level = ctx
        .player
        .weapons
        .upgrade(tier)
        .map_err(|_| ActionRejected::MaxLevel)?;
    Ok((tier, level))
}

/// Buys a dodge level at the armory.
pub fn upgrade_dodge(ctx: &mut SimulationContext) -> Result<u32, ActionRejected> {
    require_shop(ctx, ShopKind::Armory)?;
    if ctx.player.dodge_chance() >= MAX_DODGE_CHANCE {
        return Err(ActionRejected::MaxLevel);
    }
    let cost = dodge_upgrade_cost(ctx.player.dodge_level);
    let gold = ctx.player.gold;
    require(cost, gold, ActionRejected::NotEnoughGold { need: cost, have: gold })?;
    ctx.player.gold -= cost;
    ctx.player.dodge_level += 1;
    Ok(ctx.player.dodge_level)
}

/// Raises the skill in slot `index` with gems. Works anywhere on the map.
pub fn upgrade_skill(ctx: &mut SimulationContext, index: usize) -> Result<u32, ActionRejected> {
    let Some(slot) = ctx.player.skills.get(index) else {
        return Err(ActionRejected::MaxLevel);
    };
    if slot.level >= skills::MAX_SKILL_LEVEL {
        return Err(ActionRejected::MaxLevel);
    }
    let cost = skills::upgrade_cost(slot.level);
    let gems = ctx.player.gems;
    require(cost, gems, ActionRejected::NotEnoughGems { need: cost, have: gems })?;

    match ctx.player.skills.upgrade(index) {
        Some(Ok(level)) => {
            ctx.player.gems -= cost;
            Ok(level)
        }
        Some(Err(SkillUpgradeBlocked::Maxed)) | None => Err(ActionRejected::MaxLevel),
    }
}
