//! Property tests for the layout pass.

use mtext_layout::format::FormatInterpreter;
use mtext_layout::{
    AciPalette, ApproximateGlyphProvider, AttachmentPoint, ColorSettings, ColorSpec,
    ContextStack, FontKind, FormatCommand, FormattingContext, HorizontalAlignment,
    LayoutDiagnostics, LayoutOptions, LayoutResult, MTextEntity, MTextToken, ParagraphChange,
    ParagraphState, Rgb, Scale, StackDivider, StackedExpression, Typesetter, VerticalAlignment,
};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

const EPS: f64 = 1e-6;

/// Helper: lay out with the default provider and options.
fn layout(tokens: &[MTextToken], entity: &MTextEntity) -> LayoutResult {
    let fonts = ApproximateGlyphProvider::default();
    let options = LayoutOptions::default();
    Typesetter::new(&fonts, &AciPalette, &options).layout(tokens, entity)
}

fn small(g: &mut Gen, max: u8) -> f64 {
    f64::from(u8::arbitrary(g) % max)
}

fn word(g: &mut Gen) -> String {
    let len = 1 + usize::arbitrary(g) % 6;
    (0..len)
        .map(|_| *g.choose(&['a', 'b', 'x', '1', '€']).unwrap_or(&'a'))
        .collect()
}

fn scale(g: &mut Gen) -> Scale {
    let value = small(g, 8) / 2.0;
    if bool::arbitrary(g) {
        Scale::Absolute(value)
    } else {
        Scale::Relative(value)
    }
}

fn command(g: &mut Gen) -> FormatCommand {
    match u8::arbitrary(g) % 13 {
        0 => FormatCommand::GroupOpen,
        1 => FormatCommand::GroupClose,
        2 => FormatCommand::Font {
            name: (*g.choose(&["simplex", "arial", "missing"]).unwrap_or(&"simplex")).to_string(),
            bold: bool::arbitrary(g),
            italic: bool::arbitrary(g),
        },
        3 => FormatCommand::Color(ColorSpec::Index(u16::arbitrary(g) % 300)),
        4 => FormatCommand::WidthFactor(scale(g)),
        5 => FormatCommand::Height(scale(g)),
        6 => FormatCommand::Tracking(scale(g)),
        7 => FormatCommand::Oblique(small(g, 60) - 30.0),
        8 => FormatCommand::Underline(bool::arbitrary(g)),
        9 => FormatCommand::Overline(bool::arbitrary(g)),
        10 => FormatCommand::StrikeThrough(bool::arbitrary(g)),
        11 => FormatCommand::CharAlignment(
            *g.choose(&[
                VerticalAlignment::Bottom,
                VerticalAlignment::Center,
                VerticalAlignment::Top,
            ])
            .unwrap_or(&VerticalAlignment::Bottom),
        ),
        _ => FormatCommand::Paragraph(ParagraphChange {
            indent: Some(small(g, 4)),
            left: Some(small(g, 3)),
            right: Some(small(g, 3)),
            alignment: g
                .choose(&[
                    HorizontalAlignment::Left,
                    HorizontalAlignment::Center,
                    HorizontalAlignment::Right,
                    HorizontalAlignment::Distributed,
                ])
                .copied(),
            tabs: Some(vec![small(g, 6), small(g, 12)]),
        }),
    }
}

fn token(g: &mut Gen) -> MTextToken {
    match u8::arbitrary(g) % 9 {
        0 | 1 => MTextToken::Word(word(g).into()),
        2 => MTextToken::Space,
        3 => MTextToken::NonBreakingSpace,
        4 => MTextToken::Tab,
        5 => MTextToken::ParagraphBreak,
        6 => {
            let numerator = if bool::arbitrary(g) { word(g) } else { String::new() };
            let denominator = if bool::arbitrary(g) { word(g) } else { String::new() };
            let divider = *g
                .choose(&[StackDivider::Line, StackDivider::Slash, StackDivider::Tolerance])
                .unwrap_or(&StackDivider::Line);
            MTextToken::Stack(StackedExpression::new(&numerator, &denominator, divider))
        }
        _ => MTextToken::Format(command(g)),
    }
}

/// Arbitrary token stream, including unbalanced groups.
#[derive(Debug, Clone)]
struct Stream(Vec<MTextToken>);

impl Arbitrary for Stream {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 40;
        Self((0..len).map(|_| token(g)).collect())
    }
}

/// Arbitrary entity parameters.
#[derive(Debug, Clone)]
struct Entity(MTextEntity);

impl Arbitrary for Entity {
    fn arbitrary(g: &mut Gen) -> Self {
        let attachment = AttachmentPoint::try_from(1 + u8::arbitrary(g) % 9)
            .unwrap_or(AttachmentPoint::TopLeft);
        Self(MTextEntity {
            width: small(g, 20),
            height: 0.5 + small(g, 4),
            attachment,
            rotation: small(g, 7) / 2.0,
            ..MTextEntity::default()
        })
    }
}

/// Plain words for wrapping properties.
#[derive(Debug, Clone)]
struct Words(Vec<String>);

impl Arbitrary for Words {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = 1 + usize::arbitrary(g) % 12;
        Self((0..count).map(|_| word(g)).collect())
    }
}

fn spaced(words: &[String]) -> Vec<MTextToken> {
    let mut tokens = Vec::new();
    for (index, word) in words.iter().enumerate() {
        if index > 0 {
            tokens.push(MTextToken::Space);
        }
        tokens.push(MTextToken::Word(word.as_str().into()));
    }
    tokens
}

#[quickcheck]
fn prop_layout_always_completes(stream: Stream, entity: Entity) -> bool {
    let result = layout(&stream.0, &entity.0);
    result.total_height.is_finite()
        && result.total_height >= 0.0
        && result.lines.iter().all(|line| line.baseline.is_finite())
}

#[quickcheck]
fn prop_layout_is_idempotent(stream: Stream, entity: Entity) -> bool {
    let fonts = ApproximateGlyphProvider::default();
    let options = LayoutOptions::default();
    let typesetter = Typesetter::new(&fonts, &AciPalette, &options);
    typesetter.render(&stream.0, &entity.0) == typesetter.render(&stream.0, &entity.0)
}

#[quickcheck]
fn prop_closed_groups_restore_context(stream: Stream) -> bool {
    let fonts = ApproximateGlyphProvider::default();
    let options = LayoutOptions::default();
    let colors = ColorSettings::default();
    let entity = MTextEntity::default();
    let interpreter = FormatInterpreter::new(&fonts, &AciPalette, &colors, &options, &entity);

    let base = FormattingContext::new("simplex", FontKind::Stroke, 1.0, Rgb::WHITE);
    let mut contexts = ContextStack::new(base.clone());
    let mut paragraph = ParagraphState::new(HorizontalAlignment::Left);
    let mut diagnostics = LayoutDiagnostics::default();

    // Keep the inner closes balanced so the outer group is the last to close.
    let mut commands = vec![FormatCommand::GroupOpen];
    let mut depth = 0_usize;
    for token in stream.0 {
        let MTextToken::Format(command) = token else {
            continue;
        };
        match command {
            FormatCommand::GroupOpen => depth += 1,
            FormatCommand::GroupClose if depth == 0 => continue,
            FormatCommand::GroupClose => depth -= 1,
            _ => {}
        }
        commands.push(command);
    }
    commands.extend(std::iter::repeat_n(FormatCommand::GroupClose, depth + 1));

    for command in &commands {
        interpreter.apply(command, &mut contexts, &mut paragraph, &mut diagnostics);
    }
    contexts.depth() == 0 && *contexts.active() == base
}

#[quickcheck]
fn prop_words_are_never_split(words: Words, width: u8) -> bool {
    let entity = MTextEntity {
        width: f64::from(width % 10),
        ..MTextEntity::default()
    };
    let result = layout(&spaced(&words.0), &entity);
    let runs: Vec<String> = result
        .runs()
        .map(|run| run.glyphs.iter().map(|glyph| glyph.ch).collect())
        .collect();
    runs == words.0
}

#[quickcheck]
fn prop_only_first_line_is_indented(words: Words, width: u8, indent: u8) -> bool {
    let indent = f64::from(indent % 4);
    let mut tokens = vec![MTextToken::Format(FormatCommand::Paragraph(ParagraphChange {
        indent: Some(indent),
        ..ParagraphChange::default()
    }))];
    tokens.extend(spaced(&words.0));
    let entity = MTextEntity {
        width: 1.0 + f64::from(width % 10),
        ..MTextEntity::default()
    };
    let result = layout(&tokens, &entity);
    result.lines.iter().enumerate().all(|(index, line)| {
        let expected = if index == 0 { indent } else { 0.0 };
        line.starts_paragraph == (index == 0) && (line.runs[0].start_x - expected).abs() < EPS
    })
}

#[quickcheck]
fn prop_distributed_lines_fill_width(words: Words, width: u8) -> bool {
    let width = 2.0 + f64::from(width % 12);
    let mut tokens = vec![MTextToken::Format(FormatCommand::Paragraph(ParagraphChange {
        alignment: Some(HorizontalAlignment::Distributed),
        ..ParagraphChange::default()
    }))];
    tokens.extend(spaced(&words.0));
    let entity = MTextEntity {
        width,
        ..MTextEntity::default()
    };
    let result = layout(&tokens, &entity);
    result.lines.iter().all(|line| {
        let (Some(first), Some(last)) = (line.runs.first(), line.runs.last()) else {
            return false;
        };
        if line.runs.len() == 1 {
            first.start_x.abs() < EPS
        } else {
            first.start_x.abs() < EPS && (last.end_x() - width).abs() < EPS
        }
    })
}
