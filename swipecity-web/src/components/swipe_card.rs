//! The draggable question card.
//!
//! Pointer handling follows the capture-and-track pattern: the pointer that
//! started the drag is captured by the card, and only events from that
//! pointer move it. Every decision (preview, commit or snap back) is made by
//! [`SwipeGesture`]; this component only renders what it reports.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use yew::prelude::*;

use crate::game::{
    DragVector, GestureError, GestureOutcome, Question, QuestionKind, SwipeCommit, SwipeConfig,
    SwipeDirection, SwipeGesture, SwipePreview,
};
use crate::haptics::{self, Haptic};

/// Degrees of tilt per pixel of horizontal drag.
const TILT_PER_PX: f64 = 0.05;
/// Length of the snap-back transition in `static/swipecity.css`.
const SNAP_BACK_MS: u32 = 300;
const HINT_REST_OPACITY: f64 = 0.3;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub question: Question,
    #[prop_or_default]
    pub config: SwipeConfig,
    /// Time the exit animation gets before the answer is reported.
    #[prop_or(300)]
    pub commit_delay_ms: u32,
    /// One-based position of this question.
    pub position: usize,
    pub total: usize,
    #[prop_or_default]
    pub on_commit: Callback<SwipeCommit>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PointerOrigin {
    pointer_id: i32,
    x: f64,
    y: f64,
}

/// What the card currently looks like.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct CardView {
    offset: DragVector,
    preview: Option<SwipePreview>,
    dragging: bool,
    leaving: bool,
}

/// Inline transform for a card displaced by `offset`.
#[must_use]
pub fn card_style(offset: DragVector, dragging: bool) -> String {
    let transition = if dragging {
        "none"
    } else {
        "transform 0.3s ease, opacity 0.3s ease"
    };
    format!(
        "transform: translate({:.1}px, {:.1}px) rotate({:.2}deg); transition: {transition};",
        offset.dx,
        offset.dy,
        offset.dx * TILT_PER_PX
    )
}

/// Opacity of the hint for `direction` given the live preview.
#[must_use]
pub fn hint_opacity(preview: Option<SwipePreview>, direction: SwipeDirection) -> f64 {
    match preview {
        Some(preview) if preview.direction == direction => {
            preview.strength.max(HINT_REST_OPACITY)
        }
        _ => HINT_REST_OPACITY,
    }
}

#[must_use]
pub const fn arrow(direction: SwipeDirection) -> &'static str {
    match direction {
        SwipeDirection::Up => "\u{2191}",
        SwipeDirection::UpRight => "\u{2197}",
        SwipeDirection::Right => "\u{2192}",
        SwipeDirection::DownRight => "\u{2198}",
        SwipeDirection::Down => "\u{2193}",
        SwipeDirection::DownLeft => "\u{2199}",
        SwipeDirection::Left => "\u{2190}",
        SwipeDirection::UpLeft => "\u{2196}",
    }
}

fn capture_target(event: &PointerEvent) -> Option<web_sys::Element> {
    event
        .current_target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
}

/// Snap the card home and let the gesture settle once the animation is done.
fn snap_back(gesture: &Rc<RefCell<SwipeGesture>>, view: &UseStateHandle<CardView>) {
    view.set(CardView::default());
    let gesture = Rc::clone(gesture);
    #[cfg(target_arch = "wasm32")]
    crate::dom::schedule(SNAP_BACK_MS, move || gesture.borrow_mut().settle());
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = SNAP_BACK_MS;
        gesture.borrow_mut().settle();
    }
}

#[function_component(SwipeCard)]
pub fn swipe_card(p: &Props) -> Html {
    let config = p.config;
    let gesture = use_mut_ref(move || SwipeGesture::new(config));
    let origin = use_mut_ref(|| None::<PointerOrigin>);
    let view = use_state(CardView::default);

    let finish = {
        let gesture = Rc::clone(&gesture);
        let view = view.clone();
        let on_commit = p.on_commit.clone();
        let delay = p.commit_delay_ms;
        let kind = p.question.kind;
        Callback::from(move |commit: SwipeCommit| {
            haptics::trigger(Haptic::for_commit(kind));
            view.set(CardView {
                offset: commit.fling,
                leaving: true,
                ..CardView::default()
            });
            let gesture = Rc::clone(&gesture);
            let on_commit = on_commit.clone();
            let report = move || {
                gesture.borrow_mut().settle();
                on_commit.emit(commit);
            };
            #[cfg(target_arch = "wasm32")]
            crate::dom::schedule(delay, report);
            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = delay;
                report();
            }
        })
    };

    let onpointerdown = {
        let gesture = Rc::clone(&gesture);
        let origin = Rc::clone(&origin);
        let view = view.clone();
        Callback::from(move |event: PointerEvent| {
            if gesture.borrow_mut().begin().is_err() {
                return;
            }
            event.prevent_default();
            if let Some(target) = capture_target(&event) {
                let _ = target.set_pointer_capture(event.pointer_id());
            }
            *origin.borrow_mut() = Some(PointerOrigin {
                pointer_id: event.pointer_id(),
                x: f64::from(event.client_x()),
                y: f64::from(event.client_y()),
            });
            view.set(CardView {
                dragging: true,
                ..CardView::default()
            });
        })
    };

    let onpointermove = {
        let gesture = Rc::clone(&gesture);
        let origin = Rc::clone(&origin);
        let view = view.clone();
        let kind = p.question.kind;
        Callback::from(move |event: PointerEvent| {
            let Some(start) = *origin.borrow() else {
                return;
            };
            if start.pointer_id != event.pointer_id() {
                return;
            }
            let dx = f64::from(event.client_x()) - start.x;
            let dy = match kind {
                QuestionKind::Binary => 0.0,
                QuestionKind::MultiChoice => f64::from(event.client_y()) - start.y,
            };
            let mut gesture = gesture.borrow_mut();
            if gesture.update(dx, dy).is_ok() {
                view.set(CardView {
                    offset: DragVector::new(dx, dy),
                    preview: gesture.preview(kind),
                    dragging: true,
                    leaving: false,
                });
            }
        })
    };

    let onpointerup = {
        let gesture = Rc::clone(&gesture);
        let origin = Rc::clone(&origin);
        let view = view.clone();
        let finish = finish.clone();
        let question = p.question.clone();
        Callback::from(move |event: PointerEvent| {
            let ours = origin
                .borrow()
                .is_some_and(|start| start.pointer_id == event.pointer_id());
            if !ours {
                return;
            }
            origin.borrow_mut().take();
            if let Some(target) = capture_target(&event) {
                let _ = target.release_pointer_capture(event.pointer_id());
            }
            let outcome = gesture.borrow_mut().end(&question);
            match outcome {
                Ok(GestureOutcome::Commit(commit)) => finish.emit(commit),
                Ok(GestureOutcome::Cancel) => snap_back(&gesture, &view),
                Err(err @ GestureError::MissingOption { .. }) => {
                    log::warn!("Question {} cannot be answered that way: {err}", question.id);
                    snap_back(&gesture, &view);
                }
                Err(err) => log::debug!("Ignoring pointer release: {err}"),
            }
        })
    };

    let onpointercancel = {
        let gesture = Rc::clone(&gesture);
        let origin = Rc::clone(&origin);
        let view = view.clone();
        Callback::from(move |event: PointerEvent| {
            let ours = origin
                .borrow()
                .is_some_and(|start| start.pointer_id == event.pointer_id());
            if !ours {
                return;
            }
            origin.borrow_mut().take();
            if gesture.borrow_mut().abort().is_ok() {
                snap_back(&gesture, &view);
            }
        })
    };

    let current = *view;
    let hints = p
        .question
        .kind
        .directions()
        .iter()
        .filter_map(|&direction| {
            let label = p.question.option(direction)?.to_string();
            let onclick = {
                let gesture = Rc::clone(&gesture);
                let finish = finish.clone();
                let question = p.question.clone();
                Callback::from(move |_: MouseEvent| {
                    let selected = gesture.borrow_mut().select(&question, direction);
                    match selected {
                        Ok(commit) => finish.emit(commit),
                        Err(err) => log::debug!("Ignoring option tap: {err}"),
                    }
                })
            };
            let class = classes!(
                "swipe-hint",
                format!("swipe-hint--{}", direction.key()),
                current
                    .preview
                    .is_some_and(|preview| preview.direction == direction)
                    .then_some("swipe-hint--active"),
            );
            let style = format!(
                "opacity: {:.2};",
                hint_opacity(current.preview, direction)
            );
            Some(html! {
                <button type="button" {class} {style} {onclick} aria-label={label.clone()}>
                    <span class="swipe-hint__arrow" aria-hidden="true">{ arrow(direction) }</span>
                    <span class="swipe-hint__label">{ label }</span>
                </button>
            })
        })
        .collect::<Html>();

    let card_class = classes!(
        "swipe-card",
        match p.question.kind {
            QuestionKind::Binary => "swipe-card--binary",
            QuestionKind::MultiChoice => "swipe-card--multi",
        },
        current.dragging.then_some("swipe-card--dragging"),
        current.leaving.then_some("swipe-card--leaving"),
    );

    html! {
        <main role="main" class="question" aria-labelledby="question-text">
            <header class="question__progress">
                <span class="question__category">{ p.question.category.clone() }</span>
                <span class="question__count">
                    { format!("{} / {}", p.position, p.total) }
                </span>
            </header>
            <div class="swipe-area">
                <div class={card_class}
                    style={card_style(current.offset, current.dragging)}
                    {onpointerdown}
                    {onpointermove}
                    {onpointerup}
                    {onpointercancel}>
                    <p id="question-text" class="swipe-card__text">{ p.question.text.clone() }</p>
                </div>
                <nav class="swipe-hints" aria-label="Answers">{ hints }</nav>
            </div>
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BUNDLED_QUESTIONS_JSON, QuestionBank};
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    fn question(kind: QuestionKind) -> Question {
        let bank = QuestionBank::from_json(BUNDLED_QUESTIONS_JSON).unwrap();
        bank.iter().find(|q| q.kind == kind).unwrap().clone()
    }

    fn render(question: Question) -> String {
        let props = Props {
            question,
            config: SwipeConfig::default(),
            commit_delay_ms: 300,
            position: 4,
            total: 20,
            on_commit: Callback::noop(),
        };
        block_on(LocalServerRenderer::<SwipeCard>::with_props(props).render())
    }

    #[test]
    fn binary_card_offers_two_answers() {
        let q = question(QuestionKind::Binary);
        let html = render(q.clone());
        assert!(html.contains(&q.text));
        assert!(html.contains("4 / 20"));
        assert_eq!(html.matches("swipe-hint__label").count(), 2);
        assert!(html.contains("swipe-hint--left"));
        assert!(html.contains("swipe-hint--right"));
    }

    #[test]
    fn multi_choice_card_offers_eight_answers() {
        let q = question(QuestionKind::MultiChoice);
        let html = render(q.clone());
        assert_eq!(html.matches("swipe-hint__label").count(), 8);
        assert!(html.contains("swipe-hint--upLeft"));
        assert!(html.contains("swipe-card--multi"));
    }

    #[test]
    fn resting_card_is_untransformed() {
        assert_eq!(
            card_style(DragVector::ORIGIN, false),
            "transform: translate(0.0px, 0.0px) rotate(0.00deg); transition: transform 0.3s ease, opacity 0.3s ease;"
        );
        assert!(card_style(DragVector::new(100.0, 0.0), true).contains("rotate(5.00deg)"));
    }

    #[test]
    fn only_the_previewed_hint_brightens() {
        let preview = Some(SwipePreview {
            direction: SwipeDirection::Up,
            strength: 0.8,
        });
        assert!((hint_opacity(preview, SwipeDirection::Up) - 0.8).abs() < f64::EPSILON);
        assert!((hint_opacity(preview, SwipeDirection::Down) - 0.3).abs() < f64::EPSILON);
        assert!((hint_opacity(None, SwipeDirection::Up) - 0.3).abs() < f64::EPSILON);
    }
}
