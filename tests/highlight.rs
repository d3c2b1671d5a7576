//! Highlight stack renderer: marker nesting, the depth floor, rainbow cycling
//! and blip cadence.

use courtroom_sim::scene::highlight::RAINBOW_PALETTE;
use courtroom_sim::scene::{Glyph, HighlightRenderer, RevealStyle, Tick};
use courtroom_sim::theme::{Color, HighlightRule, Theme};

const BLUE: Color = Color::rgb(0x6B, 0xC6, 0xF7);
const GREY: Color = Color::rgb(0xA0, 0xA0, 0xA0);

fn renderer() -> HighlightRenderer {
    HighlightRenderer::new(Theme::default().highlights)
}

fn reveal_all(r: &mut HighlightRenderer, text: &str, style: RevealStyle) -> Vec<Glyph> {
    r.begin(text, style);
    let mut glyphs = Vec::new();
    while let Tick::Revealed(g) = r.tick() {
        glyphs.push(g);
    }
    glyphs
}

fn visible(glyphs: &[Glyph]) -> String {
    glyphs.iter().filter(|g| g.visible).map(|g| g.ch).collect()
}

#[test]
fn test_nested_markers() {
    let mut r = renderer();
    let glyphs = reveal_all(&mut r, "(a[b]c)d", RevealStyle::default());
    let colors: Vec<Color> = glyphs.iter().map(|g| g.color).collect();
    assert_eq!(
        colors,
        vec![BLUE, BLUE, GREY, GREY, GREY, BLUE, BLUE, Color::WHITE]
    );
    // Parentheses and brackets render.
    assert_eq!(visible(&glyphs), "(a[b]c)d");
    assert_eq!(r.depth(), 1);
}

#[test]
fn test_hidden_markers_are_consumed() {
    let mut r = renderer();
    let glyphs = reveal_all(&mut r, "say |this| now", RevealStyle::default());
    assert_eq!(visible(&glyphs), "say this now");
    let orange = Color::rgb(0xFF, 0x80, 0x00);
    assert_eq!(glyphs[5].color, orange);
    assert_eq!(glyphs[12].color, Color::WHITE);
}

#[test]
fn test_same_color_start_does_not_push() {
    let mut r = renderer();
    r.begin("((x))", RevealStyle::default());
    let mut depths = Vec::new();
    while let Tick::Revealed(_) = r.tick() {
        depths.push(r.depth());
    }
    assert_eq!(depths, vec![2, 2, 2, 1, 1]);
}

#[test]
fn test_depth_never_reaches_zero() {
    let samples = [
        ")))",
        "]]]``||",
        "`a`b`c`)",
        "(([[``]])))]]",
        "|)|(]`[",
        ") ( ] [ ` |",
    ];
    let mut r = renderer();
    for text in samples {
        r.begin(text, RevealStyle::default());
        loop {
            let tick = r.tick();
            assert!(r.depth() >= 1, "depth hit zero on {text:?}");
            if tick == Tick::Exhausted {
                break;
            }
        }
    }
}

#[test]
fn test_unbalanced_end_marker_renders_plain() {
    let mut r = renderer();
    let glyphs = reveal_all(&mut r, ")]", RevealStyle::default());
    assert_eq!(visible(&glyphs), ")]");
    assert!(glyphs.iter().all(|g| g.color == Color::WHITE));
}

#[test]
fn test_rainbow_has_period_five() {
    let mut r = renderer();
    let style = RevealStyle {
        rainbow: true,
        ..RevealStyle::default()
    };
    let glyphs = reveal_all(&mut r, "abcdefghijklmnop", style);
    for (i, g) in glyphs.iter().enumerate() {
        assert_eq!(g.color, RAINBOW_PALETTE[i % 5]);
    }
    assert_eq!(glyphs[0].color, glyphs[5].color);
    assert_ne!(glyphs[0].color, glyphs[1].color);
}

#[test]
fn test_rainbow_ignores_markers() {
    let mut r = renderer();
    let style = RevealStyle {
        rainbow: true,
        ..RevealStyle::default()
    };
    let glyphs = reveal_all(&mut r, "`x`", style);
    assert_eq!(visible(&glyphs), "`x`");
    assert_eq!(r.depth(), 1);
}

#[test]
fn test_base_color_only_under_base_frame() {
    let mut r = renderer();
    let red = Color::rgb(0xFF, 0, 0);
    let style = RevealStyle {
        base_color: red,
        ..RevealStyle::default()
    };
    let glyphs = reveal_all(&mut r, "a(b)", style);
    assert_eq!(glyphs[0].color, red);
    assert_eq!(glyphs[2].color, BLUE);
}

#[test]
fn test_blip_cadence() {
    let mut r = renderer();
    let style = RevealStyle {
        blip_rate: 3,
        ..RevealStyle::default()
    };
    let blips: Vec<bool> = reveal_all(&mut r, "abcdefg", style).iter().map(|g| g.blip).collect();
    assert_eq!(blips, vec![true, false, false, true, false, false, true]);
}

#[test]
fn test_blank_blips_count_spaces() {
    let mut r = renderer();
    let quiet: Vec<bool> = reveal_all(
        &mut r,
        "a b",
        RevealStyle {
            blip_rate: 2,
            ..RevealStyle::default()
        },
    )
    .iter()
    .map(|g| g.blip)
    .collect();
    assert_eq!(quiet, vec![true, false, false]);

    let loud: Vec<bool> = reveal_all(
        &mut r,
        "a b",
        RevealStyle {
            blip_rate: 2,
            blank_blips: true,
            ..RevealStyle::default()
        },
    )
    .iter()
    .map(|g| g.blip)
    .collect();
    assert_eq!(loud, vec![true, false, true]);
}

#[test]
fn test_highlighting_disabled() {
    let mut r = HighlightRenderer::new(Vec::new());
    let glyphs = reveal_all(&mut r, "`(x)`", RevealStyle::default());
    assert_eq!(visible(&glyphs), "`(x)`");
    assert!(glyphs.iter().all(|g| g.color == Color::WHITE));
}

#[test]
fn test_begin_resets_stack() {
    let mut r = renderer();
    r.begin("((", RevealStyle::default());
    r.tick();
    assert_eq!(r.depth(), 2);
    r.begin("x", RevealStyle::default());
    assert_eq!(r.depth(), 1);
    assert_eq!(r.cursor(), 0);
}

#[test]
fn test_unbalanced_hidden_end_marker_is_consumed() {
    let rule = HighlightRule {
        start: '{',
        end: '}',
        color: Color::rgb(0xFF, 0, 0xFF),
        visible: false,
    };
    let mut r = HighlightRenderer::new(vec![rule]);
    let glyphs = reveal_all(&mut r, "a}b", RevealStyle::default());
    assert_eq!(visible(&glyphs), "ab");
    assert_eq!(glyphs[1].color, Color::WHITE);
    assert_eq!(r.depth(), 1);
}
