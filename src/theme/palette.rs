//! Color constants and font size tokens for consistent theming.

use bevy::prelude::*;

// === Text Colors ===

/// Header/title text color (white).
pub const HEADER_TEXT: Color = Color::WHITE;

/// Body/subtitle text color (light gray).
pub const BODY_TEXT: Color = Color::srgb(0.7, 0.7, 0.7);

/// Gold/currency display text color (yellow-gold).
pub const GOLD_TEXT: Color = Color::srgb(1.0, 0.85, 0.0);

/// Button label text color.
pub const BUTTON_TEXT: Color = Color::srgb(0.925, 0.925, 0.925);

pub const VICTORY_TEXT: Color = Color::srgb(0.3, 0.95, 0.35);
pub const DEFEAT_TEXT: Color = Color::srgb(0.95, 0.25, 0.2);

// === UI Backgrounds ===

/// Semi-transparent dark overlay for pause/modal screens.
pub const OVERLAY_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.7);

/// Panel background (dark blue-gray, nearly opaque).
pub const PANEL_BACKGROUND: Color = Color::srgba(0.1, 0.1, 0.15, 0.95);

/// Panel border (light blue-gray, semi-transparent).
pub const PANEL_BORDER: Color = Color::srgba(0.5, 0.5, 0.6, 0.8);

/// HUD panel background (translucent so the field shows through).
pub const HUD_BACKGROUND: Color = Color::srgba(0.05, 0.05, 0.1, 0.6);

// === Button Colors ===

pub const BUTTON_BACKGROUND: Color = Color::srgb(0.275, 0.4, 0.75);
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.384, 0.6, 0.82);
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.239, 0.286, 0.6);

// === World Colors ===

pub const BACKGROUND: Color = Color::srgb(0.16, 0.22, 0.14);
pub const SAFE_ZONE: Color = Color::srgba(0.35, 0.55, 0.9, 0.35);
pub const TREE: Color = Color::srgb(0.1, 0.45, 0.15);
pub const FENCE: Color = Color::srgb(0.55, 0.38, 0.2);
pub const TOWER: Color = Color::srgb(0.45, 0.45, 0.5);
pub const WEAPON_SHOP: Color = Color::srgb(0.7, 0.5, 0.15);
pub const ARMORY: Color = Color::srgb(0.3, 0.35, 0.7);
pub const TROPHY: Color = Color::srgb(1.0, 0.85, 0.1);

// === Entity Colors ===

pub const PLAYER: Color = Color::srgb(0.2, 0.8, 0.9);
pub const PLAYER_INVINCIBLE: Color = Color::srgba(0.8, 0.95, 1.0, 0.6);
pub const ENEMY: Color = Color::srgb(0.8, 0.2, 0.2);
pub const ENEMY_FAST: Color = Color::srgb(0.95, 0.55, 0.2);
pub const ENEMY_TANK: Color = Color::srgb(0.5, 0.1, 0.1);
pub const ENEMY_RANGED: Color = Color::srgb(0.75, 0.3, 0.6);
pub const ENEMY_EXPLOSIVE: Color = Color::srgb(1.0, 0.35, 0.0);
pub const ENEMY_TELEPORTER: Color = Color::srgb(0.55, 0.2, 0.85);
pub const ENEMY_SUMMONER: Color = Color::srgb(0.3, 0.6, 0.3);
pub const MINI_BOSS: Color = Color::srgb(0.9, 0.1, 0.45);
pub const BOSS: Color = Color::srgb(0.55, 0.0, 0.2);

// === Projectile Tints ===

pub const TINT_GOLD: Color = Color::srgb(1.0, 0.85, 0.2);
pub const TINT_CYAN: Color = Color::srgb(0.3, 0.95, 1.0);
pub const TINT_RED: Color = Color::srgb(1.0, 0.25, 0.25);
pub const TINT_VIOLET: Color = Color::srgb(0.75, 0.45, 1.0);

// === Health Bar / Effect Colors ===

pub const HEALTH_BAR_BG: Color = Color::srgb(0.8, 0.1, 0.1);
pub const HEALTH_BAR_FILL: Color = Color::srgb(0.1, 0.9, 0.1);
pub const DAMAGE_ON_PLAYER: Color = Color::srgb(1.0, 0.3, 0.3);
pub const DAMAGE_ON_ENEMY: Color = Color::WHITE;
pub const MISS_TEXT: Color = Color::srgb(0.6, 0.8, 1.0);
pub const SHOCKWAVE: Color = Color::srgba(0.6, 0.8, 1.0, 0.35);
pub const EXPLOSION: Color = Color::srgba(1.0, 0.5, 0.1, 0.5);
pub const LEVEL_UP_TEXT: Color = Color::srgb(1.0, 0.95, 0.4);

// === Font Size Tokens ===

pub const FONT_SIZE_HEADER: f32 = 64.0;
pub const FONT_SIZE_LABEL: f32 = 32.0;
pub const FONT_SIZE_HUD: f32 = 20.0;
pub const FONT_SIZE_PROMPT: f32 = 24.0;
pub const FONT_SIZE_BODY: f32 = 16.0;
pub const FONT_SIZE_WORLD: f32 = 18.0;
