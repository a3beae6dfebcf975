//! Story Page entry point
//!
//! Binds the page's DOM, wires event listeners to intents and applies the
//! resulting effects. The native build runs a headless walkthrough instead.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        Document, Element, EventTarget, HtmlAnchorElement, HtmlAudioElement, HtmlButtonElement,
        HtmlElement, HtmlImageElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    };

    use story_page::audio::BackgroundMusic;
    use story_page::flow::{
        Effect, EmojiPool, Ending, Intent, PageState, SlideView, TypingHandle, TypingScript, boot,
        dispatch, timer_delay_ms,
    };
    use story_page::settings::PageConfig;

    /// Every DOM node the page touches; each one is optional
    struct PageDom {
        steps: Vec<(u8, HtmlElement)>,
        progress: Option<Element>,
        type_text: Option<Element>,
        slider: Option<Element>,
        slider_img: Option<HtmlImageElement>,
        slider_count: Option<Element>,
        slider_hint: Option<Element>,
        prev_img: Option<HtmlButtonElement>,
        next_img: Option<HtmlButtonElement>,
        ending: Option<HtmlElement>,
        ending_title: Option<Element>,
        ending_text: Option<Element>,
        whatsapp: Option<HtmlAnchorElement>,
        music_toggle: Option<Element>,
        card: Option<Element>,
        float_layer: Option<Element>,
    }

    impl PageDom {
        fn bind(document: &Document) -> Self {
            let by_id = |id: &str| {
                let el = document.get_element_by_id(id);
                if el.is_none() {
                    log::warn!("#{} not found - feature disabled", id);
                }
                el
            };

            let mut steps = Vec::new();
            if let Ok(list) = document.query_selector_all(".step") {
                for i in 0..list.length() {
                    let Some(el) = list.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok())
                    else {
                        continue;
                    };
                    match el.get_attribute("data-step").and_then(|s| s.parse::<u8>().ok()) {
                        Some(idx) => steps.push((idx, el)),
                        None => log::warn!("Step panel without a valid data-step"),
                    }
                }
            }

            Self {
                steps,
                progress: by_id("progressText"),
                type_text: by_id("typeText"),
                slider: by_id("photoSlider"),
                slider_img: by_id("sliderImg").and_then(|e| e.dyn_into().ok()),
                slider_count: by_id("sliderCount"),
                slider_hint: by_id("sliderHint"),
                prev_img: by_id("prevImg").and_then(|e| e.dyn_into().ok()),
                next_img: by_id("nextImg").and_then(|e| e.dyn_into().ok()),
                ending: by_id("ending").and_then(|e| e.dyn_into().ok()),
                ending_title: by_id("endingTitle"),
                ending_text: by_id("endingText"),
                whatsapp: by_id("whatsappBtn").and_then(|e| e.dyn_into().ok()),
                music_toggle: by_id("musicToggle"),
                card: document.query_selector(".card").ok().flatten(),
                float_layer: by_id("floatLayer"),
            }
        }
    }

    /// Page instance holding all state
    struct Page {
        state: PageState,
        config: PageConfig,
        dom: PageDom,
        music: BackgroundMusic,
        typing: Option<TypingHandle>,
        emojis: EmojiPool,
        emoji_nodes: HashMap<u32, Element>,
        rng: Pcg32,
    }

    impl Page {
        fn new(config: PageConfig, document: &Document) -> Self {
            let dom = PageDom::bind(document);
            let audio = document
                .get_element_by_id("bgMusic")
                .and_then(|e| e.dyn_into::<HtmlAudioElement>().ok());
            let seed = js_sys::Date::now() as u64;
            log::info!("Emoji seed: {}", seed);

            Self {
                state: PageState::new(&config),
                music: BackgroundMusic::new(audio, config.effective_music_volume()),
                emojis: config.emoji_pool(),
                config,
                dom,
                typing: None,
                emoji_nodes: HashMap::new(),
                rng: Pcg32::seed_from_u64(seed),
            }
        }

        fn show_step(&self, step: u8) {
            for (idx, el) in &self.dom.steps {
                el.set_hidden(*idx != step);
            }
        }

        fn show_photo(&self, view: &SlideView) {
            if let Some(img) = &self.dom.slider_img {
                let _ = img.class_list().remove_1("loaded");
                img.set_src(&view.src);
            }
            if let Some(el) = &self.dom.slider_count {
                el.set_text_content(Some(&view.counter));
            }
        }

        fn set_slider_controls(&self, enabled: bool) {
            for btn in [&self.dom.prev_img, &self.dom.next_img].into_iter().flatten() {
                btn.set_disabled(!enabled);
            }
        }

        fn photos_unavailable(&self, hint: &str) {
            if let Some(el) = &self.dom.slider_hint {
                el.set_text_content(Some(hint));
            }
            self.set_slider_controls(false);
            if let Some(img) = &self.dom.slider_img {
                let _ = img.remove_attribute("src");
            }
            if let Some(el) = &self.dom.slider_count {
                el.set_text_content(Some(""));
            }
        }

        fn show_ending(&self, title: &str, body: &str, link: &str) {
            if let Some(el) = &self.dom.ending_title {
                el.set_text_content(Some(title));
            }
            if let Some(el) = &self.dom.ending_text {
                el.set_text_content(Some(body));
            }
            if let Some(a) = &self.dom.whatsapp {
                a.set_href(link);
            }
            if let Some(el) = &self.dom.ending {
                el.set_hidden(false);
            }
        }

        fn scroll_to_ending(&self) {
            if let Some(el) = &self.dom.ending {
                let opts = ScrollIntoViewOptions::new();
                opts.set_behavior(ScrollBehavior::Smooth);
                opts.set_block(ScrollLogicalPosition::Start);
                el.scroll_into_view_with_scroll_into_view_options(&opts);
            }
        }

        /// Replace the card contents with the farewell; text goes in as text, never markup
        fn show_farewell(&self, document: &Document, title: &str, body: &str) {
            let Some(card) = &self.dom.card else { return };
            let build = || -> Result<Element, JsValue> {
                let wrap = document.create_element("div")?;
                wrap.set_attribute("style", "padding:26px 22px;")?;
                let h2 = document.create_element("h2")?;
                h2.set_attribute("style", "margin:0 0 10px;")?;
                h2.set_text_content(Some(title));
                let p = document.create_element("p")?;
                p.set_attribute(
                    "style",
                    "margin:0; line-height:1.55; color:rgba(20,20,40,0.62);",
                )?;
                p.set_text_content(Some(body));
                wrap.append_child(&h2)?;
                wrap.append_child(&p)?;
                Ok(wrap)
            };
            match build() {
                Ok(wrap) => {
                    card.set_text_content(None);
                    let _ = card.append_child(&wrap);
                }
                Err(e) => log::warn!("Could not build farewell: {:?}", e),
            }
        }

        /// Expire finished elements, then spawn one if there is room
        fn emoji_tick(&mut self, document: &Document) {
            let Some(layer) = &self.dom.float_layer else { return };
            let now = js_sys::Date::now();

            for id in self.emojis.expire(now) {
                if let Some(node) = self.emoji_nodes.remove(&id) {
                    node.remove();
                }
            }

            let Some(emoji) = self.emojis.spawn(now, &mut self.rng) else {
                log::debug!("Emoji pool full ({} live)", self.emojis.live());
                return;
            };
            let Ok(el) = document.create_element("div") else { return };
            el.set_class_name("float-emoji");
            el.set_text_content(Some(&emoji.symbol));
            let _ = el.set_attribute("style", &emoji.style());
            if layer.append_child(&el).is_ok() {
                self.emoji_nodes.insert(emoji.id, el);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Story page starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - nothing to wire");
            return;
        };

        let config = PageConfig::load();
        let page = Rc::new(RefCell::new(Page::new(config, &document)));

        {
            let p = page.borrow();
            if p.dom.slider.is_some() && p.state.slider.controls_enabled() {
                if let Some(el) = &p.dom.slider_hint {
                    el.set_text_content(Some(""));
                }
                p.set_slider_controls(true);
            }
        }

        setup_navigation(&document, page.clone());
        setup_slider(page.clone());
        setup_choices(&document, page.clone());
        setup_music_toggle(page.clone());

        let effects = boot(&mut page.borrow_mut().state);
        apply(&page, effects);

        log::info!("Story page running!");
    }

    /// Dispatch an intent and apply what it produced
    fn handle(page: &Rc<RefCell<Page>>, intent: Intent) {
        let effects = dispatch(&mut page.borrow_mut().state, intent);
        apply(page, effects);
    }

    fn apply(page: &Rc<RefCell<Page>>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowStep { step } => page.borrow().show_step(step.index()),
                Effect::SetProgress(text) => {
                    if let Some(el) = &page.borrow().dom.progress {
                        el.set_text_content(Some(&text));
                    }
                }
                Effect::StartTyping => start_typing(page),
                Effect::CancelTyping => {
                    if let Some(handle) = page.borrow_mut().typing.take() {
                        handle.cancel();
                    }
                }
                Effect::ShowPhoto(view) => {
                    let p = page.borrow();
                    if p.dom.slider.is_some() {
                        p.show_photo(&view);
                    }
                }
                Effect::PhotosUnavailable { hint } => {
                    let p = page.borrow();
                    if p.dom.slider.is_some() {
                        p.photos_unavailable(&hint);
                    }
                }
                Effect::ShowEnding { title, body, link } => {
                    page.borrow().show_ending(title, body, &link)
                }
                Effect::HideEnding => {
                    if let Some(el) = &page.borrow().dom.ending {
                        el.set_hidden(true);
                    }
                }
                Effect::ScrollToEnding => page.borrow().scroll_to_ending(),
                Effect::PlayMusic => page.borrow().music.play(),
                Effect::SetMuted { muted, glyph } => {
                    let p = page.borrow();
                    p.music.set_muted(muted);
                    if let Some(el) = &p.dom.music_toggle {
                        el.set_text_content(Some(glyph));
                    }
                }
                Effect::ShowFarewell { title, body } => {
                    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                        page.borrow().show_farewell(&document, title, body);
                    }
                }
                Effect::StartEmojis => start_emojis(page),
            }
        }
    }

    /// Sleep on the browser's timer queue
    async fn sleep(ms: u32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
            }
        });
        let _ = JsFuture::from(promise).await;
    }

    fn start_typing(page: &Rc<RefCell<Page>>) {
        let (target, script, handle) = {
            let mut p = page.borrow_mut();
            let Some(target) = p.dom.type_text.clone() else { return };
            let handle = TypingHandle::new();
            p.typing = Some(handle.clone());
            (target, p.config.typing_script(), handle)
        };
        wasm_bindgen_futures::spawn_local(run_typing(target, script, handle));
    }

    async fn run_typing(target: Element, script: TypingScript, handle: TypingHandle) {
        target.set_text_content(Some(""));
        let mut text = String::new();
        for key in script {
            if key.delay_before_ms > 0 {
                sleep(key.delay_before_ms).await;
            }
            if handle.is_cancelled() {
                log::debug!("Typing cancelled");
                return;
            }
            text.push(key.ch);
            target.set_text_content(Some(&text));
        }
        log::debug!("Typing finished");
    }

    fn start_emojis(page: &Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else { return };
        let schedule = page.borrow().config.emoji_schedule;

        for offset in schedule.burst_offsets() {
            let page = page.clone();
            let closure = Closure::once(move || spawn_emoji(&page));
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timer_delay_ms(offset),
            );
            closure.forget();
        }

        let Some(interval) = schedule.repeat_interval_ms() else {
            log::info!("Emoji interval disabled, burst only");
            return;
        };
        let page = page.clone();
        let closure = Closure::<dyn FnMut()>::new(move || spawn_emoji(&page));
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            timer_delay_ms(interval),
        );
        closure.forget();
    }

    fn spawn_emoji(page: &Rc<RefCell<Page>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else { return };
        page.borrow_mut().emoji_tick(&document);
    }

    fn on_click(target: &EventTarget, page: Rc<RefCell<Page>>, intent: Intent) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            handle(&page, intent);
        });
        let _ = target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_navigation(document: &Document, page: Rc<RefCell<Page>>) {
        for (selector, intent) in [
            ("[data-next]", Intent::Next),
            ("[data-back]", Intent::Back),
            ("[data-exit]", Intent::Exit),
        ] {
            let Ok(list) = document.query_selector_all(selector) else { continue };
            for i in 0..list.length() {
                if let Some(node) = list.get(i) {
                    on_click(&node, page.clone(), intent);
                }
            }
        }
    }

    fn setup_slider(page: Rc<RefCell<Page>>) {
        let p = page.borrow();

        // Fade in once the new source has loaded
        if let Some(img) = &p.dom.slider_img {
            let img_clone = img.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let _ = img_clone.class_list().add_1("loaded");
            });
            let _ = img.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = &p.dom.prev_img {
            on_click(btn, page.clone(), Intent::PrevPhoto);
        }
        if let Some(btn) = &p.dom.next_img {
            on_click(btn, page.clone(), Intent::NextPhoto);
        }
    }

    fn setup_choices(document: &Document, page: Rc<RefCell<Page>>) {
        for (id, ending) in [("choiceYes", Ending::Yes), ("choiceNo", Ending::No)] {
            if let Some(btn) = document.get_element_by_id(id) {
                on_click(&btn, page.clone(), Intent::Choose(ending));
            }
        }
    }

    fn setup_music_toggle(page: Rc<RefCell<Page>>) {
        let p = page.borrow();
        if !p.music.is_available() {
            return;
        }
        if let Some(btn) = &p.dom.music_toggle {
            on_click(btn, page.clone(), Intent::ToggleMusic);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_page::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Story page (native) starting...");
    log::info!("The page itself runs in the browser - build for wasm32 and serve index.html");

    println!("\nWalking through the page headlessly...");
    walkthrough();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn walkthrough() {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use story_page::flow::{Choice, Ending, Intent, PageState, Step, boot, dispatch};
    use story_page::settings::PageConfig;

    let config = PageConfig::load();
    let mut state = PageState::new(&config);

    for effect in boot(&mut state) {
        println!("  boot      -> {:?}", effect);
    }

    let typed = config.typing_script().partials();
    if let Some(last) = typed.last() {
        println!("  typing    -> {} keystrokes, final {:?}", typed.len(), last);
    }

    let intents = [Intent::Next, Intent::Next, Intent::Next, Intent::Choose(Ending::No)];
    for intent in intents {
        for effect in dispatch(&mut state, intent) {
            println!("  {:?} -> {:?}", intent, effect);
        }
    }

    assert_eq!(state.step, Step::ENDING);
    assert_eq!(state.choice, Choice::No);

    let mut pool = config.emoji_pool();
    let mut rng = Pcg32::seed_from_u64(42);
    let mut peak = 0;
    for t in config.emoji_schedule.spawn_times(120_000) {
        pool.expire(t as f64);
        pool.spawn(t as f64, &mut rng);
        peak = peak.max(pool.live());
    }
    println!("  emojis    -> peak {} live of capacity {}", peak, pool.capacity());

    println!("✓ Walkthrough reached the ending with choice {:?}", state.choice);
}
