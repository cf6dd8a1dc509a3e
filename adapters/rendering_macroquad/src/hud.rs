//! Text overlays: status bar, ability list and the per-mode menus.
//!
//! Everything drawn here is read from the scene's `HudSnapshot`; nothing in
//! this module feeds back into input.

use macroquad::{
    color::{Color, BLACK, GRAY, GREEN, RED, WHITE, YELLOW},
    shapes::draw_rectangle,
    text::{draw_text, measure_text},
};
use raycrawl_core::{Ability, GameMode, HudSnapshot, Upgrade};

const FONT_SIZE: f32 = 24.0;
const LINE_HEIGHT: f32 = 28.0;
const MARGIN: f32 = 16.0;
const OVERLAY: Color = Color::new(0.0, 0.0, 0.0, 0.7);

/// Upgrade menu entries in hotkey order.
pub(crate) const UPGRADE_MENU: [Upgrade; 7] = [
    Upgrade::Damage,
    Upgrade::Health,
    Upgrade::Speed,
    Upgrade::Unlock(Ability::DoubleShot),
    Upgrade::Unlock(Ability::HealthRegen),
    Upgrade::Unlock(Ability::SlowTime),
    Upgrade::Unlock(Ability::ExplosiveShot),
];

pub(crate) fn ability_label(ability: Ability) -> &'static str {
    match ability {
        Ability::DoubleShot => "Double Shot",
        Ability::HealthRegen => "Health Regen",
        Ability::SlowTime => "Slow Time",
        Ability::ExplosiveShot => "Explosive Shot",
    }
}

fn upgrade_label(upgrade: Upgrade) -> String {
    match upgrade {
        Upgrade::Damage => "Damage +5".to_owned(),
        Upgrade::Health => "Max health +20".to_owned(),
        Upgrade::Speed => "Speed +20".to_owned(),
        Upgrade::Unlock(ability) => format!("Unlock {}", ability_label(ability)),
    }
}

fn ability_state(ability: Ability, hud: &HudSnapshot) -> (String, Color) {
    let status = hud.abilities.get(ability);
    if !status.unlocked {
        return ("locked".to_owned(), GRAY);
    }
    if !ability.is_timed() {
        return ("passive".to_owned(), GREEN);
    }
    if !status.active_remaining.is_zero() {
        return (
            format!("active {:.1}s", status.active_remaining.as_secs_f32()),
            YELLOW,
        );
    }
    if !status.cooldown_remaining.is_zero() {
        return (
            format!("cooldown {:.0}s", status.cooldown_remaining.as_secs_f32().ceil()),
            GRAY,
        );
    }
    ("ready".to_owned(), WHITE)
}

/// Draws the always-visible status bar and ability list.
pub(crate) fn draw_status(hud: &HudSnapshot, screen_width: f32) {
    let bar_width = 200.0;
    let fraction = if hud.max_health > 0.0 {
        (hud.health / hud.max_health).clamp(0.0, 1.0)
    } else {
        0.0
    };
    draw_rectangle(MARGIN, MARGIN, bar_width, 20.0, BLACK);
    draw_rectangle(MARGIN, MARGIN, bar_width * fraction, 20.0, RED);
    draw_text(
        &format!("{:.0}/{:.0}", hud.health, hud.max_health),
        MARGIN + 6.0,
        MARGIN + 16.0,
        FONT_SIZE * 0.75,
        WHITE,
    );

    let lines = [
        format!("Dungeon {}/{}", hud.dungeon_level, hud.level_count),
        format!("Kills {}", hud.kills),
        format!(
            "Level {}  XP {}/{}",
            hud.player_level, hud.experience, hud.experience_threshold
        ),
        format!("Time {}", format_clock(hud.time_remaining.as_secs())),
    ];
    for (row, line) in lines.iter().enumerate() {
        draw_text(
            line,
            MARGIN,
            MARGIN + 44.0 + row as f32 * LINE_HEIGHT,
            FONT_SIZE,
            WHITE,
        );
    }

    let mut row = 0.0;
    for (ability, hotkey) in [(Ability::DoubleShot, "Q"), (Ability::SlowTime, "Space")] {
        let (state, color) = ability_state(ability, hud);
        let text = format!("[{hotkey}] {} {state}", ability_label(ability));
        let width = measure_text(&text, None, FONT_SIZE as u16, 1.0).width;
        draw_text(
            &text,
            screen_width - width - MARGIN,
            MARGIN + 20.0 + row * LINE_HEIGHT,
            FONT_SIZE,
            color,
        );
        row += 1.0;
    }
    for ability in [Ability::HealthRegen, Ability::ExplosiveShot] {
        let (state, color) = ability_state(ability, hud);
        let text = format!("{} {state}", ability_label(ability));
        let width = measure_text(&text, None, FONT_SIZE as u16, 1.0).width;
        draw_text(
            &text,
            screen_width - width - MARGIN,
            MARGIN + 20.0 + row * LINE_HEIGHT,
            FONT_SIZE,
            color,
        );
        row += 1.0;
    }
}

/// Draws the overlay for every mode other than [`GameMode::Running`].
pub(crate) fn draw_mode_overlay(hud: &HudSnapshot, screen_width: f32, screen_height: f32) {
    let lines: Vec<(String, Color)> = match hud.mode {
        GameMode::Running => return,
        GameMode::Paused => vec![
            ("PAUSED".to_owned(), WHITE),
            ("Press P to resume".to_owned(), GRAY),
        ],
        GameMode::Upgrade => {
            let mut lines = vec![
                ("LEVEL UP".to_owned(), YELLOW),
                (format!("Upgrade points: {}", hud.upgrade_points), WHITE),
            ];
            for (index, upgrade) in UPGRADE_MENU.into_iter().enumerate() {
                let owned = matches!(upgrade, Upgrade::Unlock(ability) if hud.abilities.get(ability).unlocked);
                let color = if owned {
                    GREEN
                } else if upgrade.cost() <= hud.upgrade_points {
                    WHITE
                } else {
                    GRAY
                };
                lines.push((
                    format!(
                        "{}. {} ({} pt)",
                        index + 1,
                        upgrade_label(upgrade),
                        upgrade.cost()
                    ),
                    color,
                ));
            }
            lines.push(("Press Enter to continue".to_owned(), GRAY));
            lines
        }
        GameMode::GameOver => vec![
            ("GAME OVER".to_owned(), RED),
            (format!("Kills: {}", hud.kills), WHITE),
            ("Press R to restart".to_owned(), GRAY),
        ],
        GameMode::Completed => vec![
            ("DUNGEON CLEARED".to_owned(), GREEN),
            (format!("Player level: {}", hud.player_level), WHITE),
            ("Press R to play again".to_owned(), GRAY),
        ],
    };

    draw_rectangle(0.0, 0.0, screen_width, screen_height, OVERLAY);
    let block = lines.len() as f32 * LINE_HEIGHT;
    let mut y = (screen_height - block) / 2.0;
    for (line, color) in &lines {
        let width = measure_text(line, None, FONT_SIZE as u16, 1.0).width;
        draw_text(line, (screen_width - width) / 2.0, y, FONT_SIZE, *color);
        y += LINE_HEIGHT;
    }
}

fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
