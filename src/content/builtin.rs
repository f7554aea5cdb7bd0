//! Shipped content tables

use super::{
    CharacterDef, EnemyBehavior, EnemyDef, StatModifiers, UpgradeCategory, UpgradeDef,
    UpgradeEffect, WeaponDef, WeaponPattern,
};

#[allow(clippy::too_many_arguments)]
fn weapon(
    id: &str,
    name: &str,
    description: &str,
    damage: f32,
    cooldown: f32,
    range: f32,
    area: f32,
    knockback: f32,
    piercing: u32,
    projectile_speed: f32,
    pattern: WeaponPattern,
    colors: (&str, &str),
) -> WeaponDef {
    WeaponDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        damage,
        cooldown,
        range,
        area,
        knockback,
        piercing,
        projectile_speed,
        pattern,
        color: colors.0.to_string(),
        trail_color: colors.1.to_string(),
    }
}

pub(super) fn weapons() -> Vec<WeaponDef> {
    use WeaponPattern::*;
    vec![
        // Sweep area is the arc in degrees; piercing 99 hits everything in the arc
        weapon(
            "sword",
            "Iron Sword",
            "A reliable blade. Sweeps in an arc, hitting all nearby enemies.",
            12.0, 1.0, 70.0, 90.0, 80.0, 99, 0.0, Sweep,
            ("#c0c0c0", "#ffffff"),
        ),
        weapon(
            "fireball",
            "Fireball",
            "Hurls a ball of flame at the nearest enemy.",
            18.0, 1.4, 350.0, 12.0, 40.0, 0, 280.0, Projectile,
            ("#ff6600", "#ff3300"),
        ),
        weapon(
            "lightning",
            "Lightning Bolt",
            "Strikes the nearest enemy with crackling energy. Fast and deadly.",
            25.0, 2.2, 400.0, 10.0, 120.0, 0, 800.0, Projectile,
            ("#88ccff", "#ffffff"),
        ),
        weapon(
            "frost_nova",
            "Frost Nova",
            "Releases a burst of ice shards in all directions.",
            10.0, 3.0, 250.0, 14.0, 60.0, 1, 180.0, Nova,
            ("#66ccff", "#aaeeff"),
        ),
        weapon(
            "axe",
            "Executioner's Axe",
            "A massive axe that cleaves through enemies with brutal force.",
            28.0, 1.8, 65.0, 110.0, 150.0, 99, 0.0, Sweep,
            ("#8b4513", "#cd853f"),
        ),
        weapon(
            "magic_missile",
            "Magic Missile",
            "A bolt of arcane energy that pierces through foes.",
            14.0, 1.1, 320.0, 11.0, 30.0, 2, 300.0, Projectile,
            ("#9966ff", "#cc99ff"),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn enemy(
    id: &str,
    name: &str,
    hp: f32,
    speed: f32,
    contact_damage: f32,
    radius: f32,
    xp_value: u32,
    color: &str,
    spawn_weight: f32,
    min_wave: u32,
) -> EnemyDef {
    EnemyDef {
        id: id.to_string(),
        name: name.to_string(),
        hp,
        speed,
        contact_damage,
        radius,
        xp_value,
        color: color.to_string(),
        behavior: EnemyBehavior::Chase,
        spawn_weight,
        min_wave,
    }
}

pub(super) fn enemies() -> Vec<EnemyDef> {
    vec![
        enemy("skeleton", "Skeleton", 20.0, 60.0, 8.0, 12.0, 3, "#d4c5a9", 10.0, 0),
        enemy("bat", "Shadow Bat", 8.0, 100.0, 5.0, 8.0, 2, "#6b3a7d", 8.0, 0),
        // Tanky and slow, hits hard
        enemy("zombie", "Undead Brute", 50.0, 35.0, 15.0, 16.0, 8, "#3d5c3a", 4.0, 2),
    ]
}

pub(super) fn characters() -> Vec<CharacterDef> {
    vec![
        CharacterDef {
            id: "knight".to_string(),
            name: "Knight".to_string(),
            description: "A steadfast warrior. Balanced stats, starts with Iron Sword.".to_string(),
            starting_weapon_id: "sword".to_string(),
            stat_modifiers: StatModifiers {
                max_hp: 10.0,
                armor: 1.0,
                ..Default::default()
            },
            color: "#5b8dd9".to_string(),
            unlocked: true,
        },
        CharacterDef {
            id: "mage".to_string(),
            name: "Mage".to_string(),
            description: "A powerful sorcerer. Fragile but devastating. Starts with Fireball."
                .to_string(),
            starting_weapon_id: "fireball".to_string(),
            stat_modifiers: StatModifiers {
                max_hp: -20.0,
                damage: 0.2,
                speed: -10.0,
                ..Default::default()
            },
            color: "#9b59b6".to_string(),
            unlocked: true,
        },
    ]
}

fn stat_upgrade(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    max_level: u32,
    weight: f32,
    modifiers: StatModifiers,
) -> UpgradeDef {
    UpgradeDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        max_level,
        category: UpgradeCategory::Stat,
        weight,
        effect: UpgradeEffect::Stats { modifiers, heal: 0.0 },
    }
}

/// One unlock entry and one level-up entry per weapon
fn weapon_upgrades(weapon_id: &str, name: &str, pitch: &str, icon: &str, unlock_weight: f32) -> [UpgradeDef; 2] {
    [
        UpgradeDef {
            id: format!("weapon_{weapon_id}"),
            name: name.to_string(),
            description: format!("Unlock: {pitch}"),
            icon: icon.to_string(),
            max_level: 1,
            category: UpgradeCategory::Weapon,
            weight: unlock_weight,
            effect: UpgradeEffect::UnlockWeapon {
                weapon_id: weapon_id.to_string(),
            },
        },
        UpgradeDef {
            id: format!("up_{weapon_id}"),
            name: format!("{name}+"),
            description: format!("+20% damage to {name}"),
            icon: format!("{icon}+"),
            max_level: 4,
            category: UpgradeCategory::Weapon,
            weight: 8.0,
            effect: UpgradeEffect::LevelWeapon {
                weapon_id: weapon_id.to_string(),
            },
        },
    ]
}

pub(super) fn upgrades() -> Vec<UpgradeDef> {
    let mut upgrades = vec![
        UpgradeDef {
            id: "up_max_hp".to_string(),
            name: "Vitality".to_string(),
            description: "+20 Max HP and heal 20 HP".to_string(),
            icon: "\u{2665}".to_string(),
            max_level: 5,
            category: UpgradeCategory::Stat,
            weight: 8.0,
            effect: UpgradeEffect::Stats {
                modifiers: StatModifiers {
                    max_hp: 20.0,
                    ..Default::default()
                },
                heal: 20.0,
            },
        },
        stat_upgrade(
            "up_speed", "Swift Boots", "+15% movement speed", "\u{2192}", 3, 6.0,
            StatModifiers { speed: 27.0, ..Default::default() },
        ),
        stat_upgrade(
            "up_damage", "Might", "+15% damage", "\u{2694}", 5, 8.0,
            StatModifiers { damage: 0.15, ..Default::default() },
        ),
        stat_upgrade(
            "up_attack_speed", "Fervor", "+12% attack speed", "\u{26A1}", 5, 7.0,
            StatModifiers { attack_speed: 0.12, ..Default::default() },
        ),
        stat_upgrade(
            "up_armor", "Iron Skin", "+2 armor (reduces damage taken)", "\u{26E8}", 5, 5.0,
            StatModifiers { armor: 2.0, ..Default::default() },
        ),
        stat_upgrade(
            "up_area", "Reach", "+15% weapon area", "\u{25CE}", 3, 5.0,
            StatModifiers { area: 0.15, ..Default::default() },
        ),
        stat_upgrade(
            "up_xp_gain", "Wisdom", "+20% XP gain", "\u{2606}", 3, 6.0,
            StatModifiers { xp_gain: 0.2, ..Default::default() },
        ),
        stat_upgrade(
            "up_magnet", "Magnetism", "+40 pickup range", "\u{2609}", 3, 5.0,
            StatModifiers { magnet_range: 40.0, ..Default::default() },
        ),
        stat_upgrade(
            "up_projectile", "Multishot", "+1 projectile for ranged weapons", "\u{2023}", 2, 4.0,
            StatModifiers { projectile_count: 1, ..Default::default() },
        ),
        UpgradeDef {
            id: "up_heal".to_string(),
            name: "Healing Surge".to_string(),
            description: "Restore 30 HP".to_string(),
            icon: "+".to_string(),
            max_level: 99,
            category: UpgradeCategory::Special,
            weight: 4.0,
            effect: UpgradeEffect::Heal { amount: 30.0 },
        },
    ];

    let weapons = [
        ("sword", "Iron Sword", "A reliable blade that sweeps in an arc.", "\u{2694}", 10.0),
        ("fireball", "Fireball", "Launches a blazing projectile at enemies.", "\u{1F525}", 10.0),
        ("lightning", "Lightning Bolt", "Strikes enemies with crackling energy.", "\u{26A1}", 7.0),
        ("frost_nova", "Frost Nova", "Releases a burst of ice shards in all directions.", "\u{2744}", 7.0),
        ("axe", "Executioner's Axe", "A massive axe that cleaves through enemies.", "\u{1FA93}", 7.0),
        ("magic_missile", "Magic Missile", "A bolt of arcane energy that pierces foes.", "\u{2728}", 7.0),
    ];
    for (id, name, pitch, icon, weight) in weapons {
        upgrades.extend(weapon_upgrades(id, name, pitch, icon, weight));
    }
    upgrades
}
