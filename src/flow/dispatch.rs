//! Intent dispatch
//!
//! Maps UI intents onto state transitions and returns the UI effects the
//! rendering surface must apply, in order.

use super::ending::{Ending, whatsapp_link};
use super::slider::SlideView;
use super::state::{Choice, PageState, Step};

pub const FAREWELL_TITLE: &str = "All good.";
pub const FAREWELL_BODY: &str = "You don’t have to do anything with this. If you ever want to talk, you know where to find me.";

/// Something the visitor did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// `data-next` button
    Next,
    /// `data-back` button
    Back,
    /// `data-exit` button
    Exit,
    /// Yes/No on the offer step
    Choose(Ending),
    PrevPhoto,
    NextPhoto,
    ToggleMusic,
}

/// Something the page must show or do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show this panel, hide every other one
    ShowStep { step: Step },
    SetProgress(String),
    /// Begin the intro typing effect (emitted at most once per page life)
    StartTyping,
    /// Stop a running typing effect
    CancelTyping,
    ShowPhoto(SlideView),
    /// No photos configured: disable controls and show the hint
    PhotosUnavailable { hint: String },
    ShowEnding {
        title: &'static str,
        body: &'static str,
        link: String,
    },
    HideEnding,
    ScrollToEnding,
    /// Attempt background playback (emitted at most once per page life)
    PlayMusic,
    SetMuted { muted: bool, glyph: &'static str },
    /// Replace the card with the farewell message
    ShowFarewell {
        title: &'static str,
        body: &'static str,
    },
    StartEmojis,
}

/// Effects for page load: first render, slider init, emoji animator
pub fn boot(state: &mut PageState) -> Vec<Effect> {
    let mut effects = Vec::new();
    render(state, &mut effects);

    match state.slider.show(0) {
        Some(view) => effects.push(Effect::ShowPhoto(view)),
        None => effects.push(Effect::PhotosUnavailable {
            hint: state.slider.photos().empty_hint(),
        }),
    }

    effects.push(Effect::StartEmojis);
    log::info!("Page booted on step {}", state.step.name());
    effects
}

/// Apply one intent to the page state
pub fn dispatch(state: &mut PageState, intent: Intent) -> Vec<Effect> {
    let mut effects = Vec::new();

    // The music toggle lives outside the card and keeps working after exit
    if state.exited && intent != Intent::ToggleMusic {
        log::debug!("Ignoring {:?} after exit", intent);
        return effects;
    }

    match intent {
        Intent::Next => {
            if state.music.start_once() {
                effects.push(Effect::PlayMusic);
            }
            let target = state.step.index() as i64 + 1;
            go_to_step(state, target, &mut effects);
        }
        Intent::Back => {
            if state.step.is_ending() {
                state.choice = Choice::Unset;
                effects.push(Effect::HideEnding);
            }
            let target = state.step.index() as i64 - 1;
            go_to_step(state, target, &mut effects);
        }
        Intent::Exit => {
            state.exited = true;
            effects.push(Effect::CancelTyping);
            effects.push(Effect::ShowFarewell {
                title: FAREWELL_TITLE,
                body: FAREWELL_BODY,
            });
            log::info!("Visitor exited on step {}", state.step.name());
        }
        Intent::Choose(ending) => {
            state.choice = Choice::from(ending);
            effects.push(Effect::ShowEnding {
                title: ending.title(),
                body: ending.body(),
                link: whatsapp_link(&state.recipient, ending.message()),
            });
            effects.push(Effect::ScrollToEnding);
            log::info!("Ending chosen: {}", ending.as_str());
        }
        Intent::PrevPhoto => {
            if let Some(view) = state.slider.prev() {
                effects.push(Effect::ShowPhoto(view));
            }
        }
        Intent::NextPhoto => {
            if let Some(view) = state.slider.next() {
                effects.push(Effect::ShowPhoto(view));
            }
        }
        Intent::ToggleMusic => {
            let muted = state.music.toggle_mute();
            effects.push(Effect::SetMuted {
                muted,
                glyph: state.music.glyph(),
            });
        }
    }

    effects
}

fn go_to_step(state: &mut PageState, requested: i64, effects: &mut Vec<Effect>) {
    let step = Step::clamped(requested);
    if step != state.step {
        log::info!("Step {} -> {}", state.step.name(), step.name());
    }
    state.step = step;
    render(state, effects);
}

fn render(state: &mut PageState, effects: &mut Vec<Effect>) {
    effects.push(Effect::ShowStep { step: state.step });
    effects.push(Effect::SetProgress(state.step.progress_text()));

    if state.step.is_ending() && !state.choice.is_set() {
        effects.push(Effect::HideEnding);
    }

    if state.step == Step::INTRO && !state.typing_started {
        state.typing_started = true;
        effects.push(Effect::StartTyping);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PageConfig;
    use proptest::prelude::*;

    fn count(effects: &[Effect], pred: impl Fn(&Effect) -> bool) -> usize {
        effects.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_boot_renders_intro_and_slider() {
        let mut state = PageState::default();
        let effects = boot(&mut state);
        assert_eq!(effects[0], Effect::ShowStep { step: Step::INTRO });
        assert_eq!(effects[1], Effect::SetProgress("1 / 4".to_string()));
        assert!(effects.contains(&Effect::StartTyping));
        assert!(effects.iter().any(|e| matches!(e, Effect::ShowPhoto(v) if v.src == "images/1.jpeg")));
        assert_eq!(effects.last(), Some(&Effect::StartEmojis));
        assert!(state.typing_started);
    }

    #[test]
    fn test_boot_without_photos() {
        let config = PageConfig {
            photo_count: 0,
            ..Default::default()
        };
        let mut state = PageState::new(&config);
        let effects = boot(&mut state);
        assert!(effects.iter().any(|e| matches!(e, Effect::PhotosUnavailable { .. })));
        assert!(dispatch(&mut state, Intent::NextPhoto).is_empty());
    }

    #[test]
    fn test_typing_starts_once() {
        let mut state = PageState::default();
        boot(&mut state);
        let effects = dispatch(&mut state, Intent::Next);
        assert_eq!(count(&effects, |e| *e == Effect::StartTyping), 0);
        let effects = dispatch(&mut state, Intent::Back);
        assert_eq!(state.step, Step::INTRO);
        assert_eq!(count(&effects, |e| *e == Effect::StartTyping), 0);
    }

    #[test]
    fn test_music_plays_on_first_next_only() {
        let mut state = PageState::default();
        boot(&mut state);
        let first = dispatch(&mut state, Intent::Next);
        assert_eq!(first[0], Effect::PlayMusic);
        let second = dispatch(&mut state, Intent::Next);
        assert_eq!(count(&second, |e| *e == Effect::PlayMusic), 0);
        // Back never starts music
        let mut fresh = PageState::default();
        let back = dispatch(&mut fresh, Intent::Back);
        assert_eq!(count(&back, |e| *e == Effect::PlayMusic), 0);
    }

    #[test]
    fn test_toggle_music_twice_restores() {
        let mut state = PageState::default();
        let effects = dispatch(&mut state, Intent::ToggleMusic);
        assert_eq!(
            effects,
            vec![Effect::SetMuted { muted: true, glyph: "🔇" }]
        );
        let effects = dispatch(&mut state, Intent::ToggleMusic);
        assert_eq!(
            effects,
            vec![Effect::SetMuted { muted: false, glyph: "🔈" }]
        );
        assert!(!state.music.started);
    }

    #[test]
    fn test_entering_ending_hides_panel_until_choice() {
        let mut state = PageState::default();
        boot(&mut state);
        dispatch(&mut state, Intent::Next);
        dispatch(&mut state, Intent::Next);
        let effects = dispatch(&mut state, Intent::Next);
        assert_eq!(state.step, Step::ENDING);
        assert_eq!(state.choice, Choice::Unset);
        assert!(effects.contains(&Effect::HideEnding));
    }

    #[test]
    fn test_choose_yes() {
        let mut state = PageState::default();
        state.step = Step::ENDING;
        let effects = dispatch(&mut state, Intent::Choose(Ending::Yes));
        assert_eq!(state.choice, Choice::Yes);
        match &effects[0] {
            Effect::ShowEnding { title, link, .. } => {
                assert_eq!(*title, Ending::Yes.title());
                assert!(link.starts_with("https://wa.me/27838582088?text="));
                assert!(link.contains("open%20to%20a%20proper%20talk"));
            }
            other => panic!("unexpected effect {:?}", other),
        }
        assert_eq!(effects[1], Effect::ScrollToEnding);
    }

    #[test]
    fn test_choose_twice_overwrites() {
        let mut state = PageState::default();
        state.step = Step::ENDING;
        dispatch(&mut state, Intent::Choose(Ending::Yes));
        dispatch(&mut state, Intent::Choose(Ending::No));
        assert_eq!(state.choice, Choice::No);
    }

    #[test]
    fn test_back_from_ending_clears_choice() {
        let mut state = PageState::default();
        state.step = Step::ENDING;
        dispatch(&mut state, Intent::Choose(Ending::No));
        let effects = dispatch(&mut state, Intent::Back);
        assert_eq!(state.choice, Choice::Unset);
        assert_eq!(state.step, Step::OFFER);
        assert_eq!(effects[0], Effect::HideEnding);
        assert!(effects.contains(&Effect::SetProgress("3 / 4".to_string())));
    }

    #[test]
    fn test_scenario_next_three_times_then_no() {
        let mut state = PageState::default();
        boot(&mut state);
        for _ in 0..3 {
            dispatch(&mut state, Intent::Next);
        }
        let effects = dispatch(&mut state, Intent::Choose(Ending::No));

        assert_eq!(state.step, Step::ENDING);
        assert_eq!(state.choice, Choice::No);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::ShowEnding { body, link, .. }
                if *body == Ending::No.body() && link.contains("not%20ready%20to%20restart")
        )));
    }

    #[test]
    fn test_exit_freezes_card() {
        let mut state = PageState::default();
        boot(&mut state);
        let effects = dispatch(&mut state, Intent::Exit);
        assert_eq!(effects[0], Effect::CancelTyping);
        assert_eq!(
            effects[1],
            Effect::ShowFarewell {
                title: FAREWELL_TITLE,
                body: FAREWELL_BODY
            }
        );
        assert!(dispatch(&mut state, Intent::Next).is_empty());
        assert!(dispatch(&mut state, Intent::Back).is_empty());
        assert!(dispatch(&mut state, Intent::NextPhoto).is_empty());
        assert!(dispatch(&mut state, Intent::Choose(Ending::Yes)).is_empty());
        assert!(dispatch(&mut state, Intent::Exit).is_empty());
        assert_eq!(state.step, Step::INTRO);
        assert_eq!(state.choice, Choice::Unset);
    }

    #[test]
    fn test_music_toggle_survives_exit() {
        let mut state = PageState::default();
        boot(&mut state);
        dispatch(&mut state, Intent::Next);
        dispatch(&mut state, Intent::Exit);

        let effects = dispatch(&mut state, Intent::ToggleMusic);
        assert_eq!(effects, vec![Effect::SetMuted { muted: true, glyph: "🔇" }]);
        assert!(state.music.muted);

        let effects = dispatch(&mut state, Intent::ToggleMusic);
        assert_eq!(effects, vec![Effect::SetMuted { muted: false, glyph: "🔈" }]);
        assert!(!state.music.muted);
    }

    #[test]
    fn test_slider_intents() {
        let mut state = PageState::default();
        boot(&mut state);
        let effects = dispatch(&mut state, Intent::PrevPhoto);
        assert!(matches!(&effects[0], Effect::ShowPhoto(v) if v.counter == "4 / 4"));
        let effects = dispatch(&mut state, Intent::NextPhoto);
        assert!(matches!(&effects[0], Effect::ShowPhoto(v) if v.counter == "1 / 4"));
    }

    fn arb_nav() -> impl Strategy<Value = Intent> {
        prop_oneof![Just(Intent::Next), Just(Intent::Back)]
    }

    proptest! {
        #[test]
        fn prop_navigation_renders_exactly_one_panel(intents in proptest::collection::vec(arb_nav(), 0..40)) {
            let mut state = PageState::default();
            boot(&mut state);
            let mut expected: i64 = 0;
            for intent in intents {
                expected = match intent {
                    Intent::Next => (expected + 1).clamp(0, 3),
                    _ => (expected - 1).clamp(0, 3),
                };
                let effects = dispatch(&mut state, intent);
                prop_assert_eq!(state.step.index() as i64, expected);
                prop_assert_eq!(count(&effects, |e| matches!(e, Effect::ShowStep { .. })), 1);
                let progress = format!("{} / 4", expected + 1);
                prop_assert!(effects.contains(&Effect::SetProgress(progress)));
                prop_assert_eq!(state.choice, Choice::Unset);
            }
        }
    }
}
