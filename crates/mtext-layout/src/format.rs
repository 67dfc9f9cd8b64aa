//! Applies inline formatting commands to the context stack and the
//! paragraph state.

use log::trace;
use mtext_common::warning::warn_once;

use crate::color::{ColorIndexResolver, ColorSettings};
use crate::context::ContextStack;
use crate::diagnostics::LayoutDiagnostics;
use crate::font::{FontInfo, FontKind, GlyphProvider};
use crate::options::{LayoutOptions, MTextEntity};
use crate::paragraph::ParagraphState;
use crate::token::{FormatCommand, Scale};

/// A font name resolved against the glyph provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFont {
    /// Name glyphs are requested with.
    pub name: String,
    /// Metadata of that font.
    pub info: FontInfo,
}

/// Interprets [`FormatCommand`]s for one entity.
pub struct FormatInterpreter<'a> {
    fonts: &'a dyn GlyphProvider,
    palette: &'a dyn ColorIndexResolver,
    colors: &'a ColorSettings,
    options: &'a LayoutOptions,
    entity: &'a MTextEntity,
}

impl<'a> FormatInterpreter<'a> {
    /// Create an interpreter for `entity`.
    #[must_use]
    pub const fn new(
        fonts: &'a dyn GlyphProvider,
        palette: &'a dyn ColorIndexResolver,
        colors: &'a ColorSettings,
        options: &'a LayoutOptions,
        entity: &'a MTextEntity,
    ) -> Self {
        Self {
            fonts,
            palette,
            colors,
            options,
            entity,
        }
    }

    /// Resolve `requested` through the provider's fallback table, then the
    /// configured default font.
    ///
    /// Any request the provider cannot serve directly is recorded as a
    /// missing font. When even the default is unavailable the requested
    /// name is kept and glyph lookup falls through to the unscoped search.
    pub fn resolve_font(
        &self,
        requested: &str,
        current_kind: FontKind,
        diagnostics: &mut LayoutDiagnostics,
    ) -> ResolvedFont {
        if let Some(info) = self.fonts.font_info(requested) {
            return ResolvedFont {
                name: requested.to_string(),
                info,
            };
        }

        diagnostics.record_missing_font(requested);

        let candidates = self
            .fonts
            .fallback_font(requested)
            .into_iter()
            .chain(std::iter::once(self.options.default_font.clone()));
        for candidate in candidates {
            if let Some(info) = self.fonts.font_info(&candidate) {
                warn_once(
                    "Font",
                    &format!("font '{requested}' not available, using '{candidate}'"),
                );
                return ResolvedFont {
                    name: candidate,
                    info,
                };
            }
        }

        warn_once(
            "Font",
            &format!("font '{requested}' and the default font are not available"),
        );
        ResolvedFont {
            name: requested.to_string(),
            info: FontInfo {
                kind: current_kind,
                scale_factor: 1.0,
            },
        }
    }

    /// Apply one command.
    pub fn apply(
        &self,
        command: &FormatCommand,
        contexts: &mut ContextStack,
        paragraph: &mut ParagraphState,
        diagnostics: &mut LayoutDiagnostics,
    ) {
        match command {
            FormatCommand::GroupOpen => contexts.push(),
            FormatCommand::GroupClose => contexts.pop(),
            FormatCommand::Font { name, bold, italic } => {
                let current_kind = contexts.active().font_kind;
                let resolved = self.resolve_font(name, current_kind, diagnostics);
                if (*bold || *italic) && resolved.info.kind == FontKind::Stroke {
                    diagnostics.record_unsupported_style();
                }
                let context = contexts.active_mut();
                context.font = resolved.name;
                context.font_kind = resolved.info.kind;
                context.font_scale_factor = resolved.info.scale_factor;
                context.bold = *bold;
                context.italic = *italic;
                context.refresh_blank_width();
            }
            FormatCommand::Color(spec) => {
                contexts.active_mut().color = self.colors.resolve(*spec, self.palette);
            }
            FormatCommand::WidthFactor(scale) => {
                let context = contexts.active_mut();
                let next = match *scale {
                    Scale::Absolute(value) => value * self.entity.width_factor,
                    Scale::Relative(value)
                        if self.options.legacy_relative_width_factor && self.entity.wraps() =>
                    {
                        value * self.entity.width
                    }
                    Scale::Relative(value) => context.width_factor * value,
                };
                if is_positive(next) {
                    context.width_factor = next;
                }
            }
            FormatCommand::Height(scale) => {
                let context = contexts.active_mut();
                match *scale {
                    Scale::Absolute(value) if is_positive(value) => {
                        context.font_size = value;
                        context.font_size_scale_factor = 1.0;
                    }
                    Scale::Relative(value) if is_positive(value) => {
                        context.font_size_scale_factor *= value;
                    }
                    Scale::Absolute(_) | Scale::Relative(_) => return,
                }
                context.refresh_blank_width();
            }
            FormatCommand::Tracking(scale) => {
                let context = contexts.active_mut();
                let next = match *scale {
                    Scale::Absolute(value) => value,
                    Scale::Relative(value) => context.tracking * value,
                };
                if is_positive(next) {
                    context.tracking = next;
                }
            }
            FormatCommand::Oblique(angle) => {
                if angle.is_finite() {
                    contexts.active_mut().oblique_angle = *angle;
                }
            }
            FormatCommand::Underline(on) => contexts.active_mut().underline = *on,
            FormatCommand::Overline(on) => contexts.active_mut().overline = *on,
            FormatCommand::StrikeThrough(on) => contexts.active_mut().strike_through = *on,
            FormatCommand::CharAlignment(alignment) => {
                contexts.active_mut().char_alignment = *alignment;
            }
            FormatCommand::Paragraph(change) => paragraph.apply(change),
            FormatCommand::Unknown(code) => trace!(target: "mtext", "ignoring format command {code}"),
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{AciPalette, ColorSpec, Rgb};
    use crate::context::FormattingContext;
    use crate::font::ApproximateGlyphProvider;
    use crate::token::{HorizontalAlignment, ParagraphChange};

    struct Fixture {
        fonts: ApproximateGlyphProvider,
        colors: ColorSettings,
        options: LayoutOptions,
        entity: MTextEntity,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                fonts: ApproximateGlyphProvider::default().with_alias("txt", "simplex"),
                colors: ColorSettings::default(),
                options: LayoutOptions::default(),
                entity: MTextEntity {
                    height: 2.0,
                    ..MTextEntity::default()
                },
            }
        }

        fn interpreter(&self) -> FormatInterpreter<'_> {
            FormatInterpreter::new(
                &self.fonts,
                &AciPalette,
                &self.colors,
                &self.options,
                &self.entity,
            )
        }
    }

    fn stack() -> ContextStack {
        ContextStack::new(FormattingContext::new(
            "simplex",
            FontKind::Stroke,
            2.0,
            Rgb::WHITE,
        ))
    }

    fn apply_all(fixture: &Fixture, commands: &[FormatCommand]) -> (ContextStack, LayoutDiagnostics) {
        let interpreter = fixture.interpreter();
        let mut contexts = stack();
        let mut paragraph = ParagraphState::new(HorizontalAlignment::Left);
        let mut diagnostics = LayoutDiagnostics::default();
        for command in commands {
            interpreter.apply(command, &mut contexts, &mut paragraph, &mut diagnostics);
        }
        (contexts, diagnostics)
    }

    #[test]
    fn test_group_restores_context() {
        let fixture = Fixture::new();
        let (contexts, _) = apply_all(
            &fixture,
            &[
                FormatCommand::GroupOpen,
                FormatCommand::Color(ColorSpec::Index(1)),
                FormatCommand::Height(Scale::Relative(2.0)),
                FormatCommand::GroupClose,
            ],
        );
        assert_eq!(contexts.active(), stack().active());
    }

    #[test]
    fn test_unbalanced_close_is_ignored() {
        let fixture = Fixture::new();
        let (contexts, _) = apply_all(
            &fixture,
            &[
                FormatCommand::Underline(true),
                FormatCommand::GroupClose,
                FormatCommand::GroupClose,
            ],
        );
        assert!(contexts.active().underline);
        assert_eq!(contexts.depth(), 0);
    }

    #[test]
    fn test_font_change_and_fallback() {
        let fixture = Fixture::new();
        let (contexts, diagnostics) = apply_all(
            &fixture,
            &[FormatCommand::Font {
                name: "arial".to_string(),
                bold: true,
                italic: false,
            }],
        );
        assert_eq!(contexts.active().font, "arial");
        assert_eq!(contexts.active().font_kind, FontKind::Filled);
        assert!(contexts.active().bold);
        assert!(diagnostics.is_clean());

        let (contexts, diagnostics) = apply_all(
            &fixture,
            &[FormatCommand::Font {
                name: "txt".to_string(),
                bold: false,
                italic: true,
            }],
        );
        assert_eq!(contexts.active().font, "simplex");
        assert_eq!(diagnostics.missing_fonts["txt"], 1);
        assert_eq!(diagnostics.unsupported_font_styles, 1);

        let (contexts, diagnostics) = apply_all(
            &fixture,
            &[FormatCommand::Font {
                name: "nowhere".to_string(),
                bold: false,
                italic: false,
            }],
        );
        assert_eq!(contexts.active().font, "simplex");
        assert_eq!(diagnostics.missing_fonts["nowhere"], 1);
    }

    #[test]
    fn test_height_commands() {
        let fixture = Fixture::new();
        let (contexts, _) = apply_all(
            &fixture,
            &[
                FormatCommand::Height(Scale::Relative(2.0)),
                FormatCommand::Height(Scale::Relative(0.5)),
                FormatCommand::Height(Scale::Relative(3.0)),
            ],
        );
        assert!((contexts.active().effective_size() - 6.0).abs() < 1e-9);

        let (contexts, _) = apply_all(
            &fixture,
            &[
                FormatCommand::Height(Scale::Relative(3.0)),
                FormatCommand::Height(Scale::Absolute(5.0)),
                FormatCommand::Height(Scale::Absolute(-1.0)),
            ],
        );
        assert!((contexts.active().effective_size() - 5.0).abs() < 1e-9);
        assert!((contexts.active().blank_width - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_width_factor_modes() {
        let mut fixture = Fixture::new();
        fixture.entity.width_factor = 0.5;
        let (contexts, _) = apply_all(&fixture, &[FormatCommand::WidthFactor(Scale::Absolute(2.0))]);
        assert!((contexts.active().width_factor - 1.0).abs() < 1e-9);

        let (contexts, _) = apply_all(&fixture, &[FormatCommand::WidthFactor(Scale::Relative(0.5))]);
        assert!((contexts.active().width_factor - 0.5).abs() < 1e-9);

        fixture.entity.width = 4.0;
        let (contexts, _) = apply_all(&fixture, &[FormatCommand::WidthFactor(Scale::Relative(0.5))]);
        assert!((contexts.active().width_factor - 2.0).abs() < 1e-9);

        fixture.options.legacy_relative_width_factor = false;
        let (contexts, _) = apply_all(&fixture, &[FormatCommand::WidthFactor(Scale::Relative(0.5))]);
        assert!((contexts.active().width_factor - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tracking_and_flags() {
        let fixture = Fixture::new();
        let (contexts, _) = apply_all(
            &fixture,
            &[
                FormatCommand::Tracking(Scale::Absolute(2.0)),
                FormatCommand::Tracking(Scale::Relative(1.5)),
                FormatCommand::Oblique(12.0),
                FormatCommand::Overline(true),
                FormatCommand::StrikeThrough(true),
                FormatCommand::Unknown("X".to_string()),
            ],
        );
        let context = contexts.active();
        assert!((context.tracking - 3.0).abs() < 1e-9);
        assert!((context.oblique_angle - 12.0).abs() < 1e-9);
        assert!(context.overline && context.strike_through && !context.underline);
    }

    #[test]
    fn test_color_resolution() {
        let fixture = Fixture::new();
        let (contexts, _) = apply_all(&fixture, &[FormatCommand::Color(ColorSpec::Index(1))]);
        assert_eq!(contexts.active().color, Rgb::new(255, 0, 0));
        let (contexts, _) = apply_all(&fixture, &[FormatCommand::Color(ColorSpec::Rgb(0x00_80_40))]);
        assert_eq!(contexts.active().color, Rgb::new(0, 0x80, 0x40));
    }

    #[test]
    fn test_paragraph_survives_group_close() {
        let fixture = Fixture::new();
        let interpreter = fixture.interpreter();
        let mut contexts = stack();
        let mut paragraph = ParagraphState::new(HorizontalAlignment::Left);
        let mut diagnostics = LayoutDiagnostics::default();
        for command in [
            FormatCommand::GroupOpen,
            FormatCommand::Paragraph(ParagraphChange {
                alignment: Some(HorizontalAlignment::Right),
                ..ParagraphChange::default()
            }),
            FormatCommand::GroupClose,
        ] {
            interpreter.apply(&command, &mut contexts, &mut paragraph, &mut diagnostics);
        }
        assert_eq!(paragraph.alignment, HorizontalAlignment::Right);
    }
}
