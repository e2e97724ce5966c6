use crate::app::{App, Field, Msg, Route};
use crate::models::{Pagination, Post};
use wasm_bindgen::JsValue;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

fn format_date(iso: &str) -> String {
    let date = js_sys::Date::new(&JsValue::from_str(iso));
    if date.get_time().is_nan() {
        return iso.to_string();
    }
    date.to_locale_date_string("en-US", &JsValue::UNDEFINED)
        .into()
}

fn excerpt(content: &str, max_chars: usize) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn submit(ctx: &Context<App>, msg: fn() -> Msg) -> Callback<SubmitEvent> {
    ctx.link().callback(move |e: SubmitEvent| {
        e.prevent_default();
        msg()
    })
}

impl App {
    fn go(ctx: &Context<Self>, route: Route) -> Callback<MouseEvent> {
        ctx.link().callback(move |e: MouseEvent| {
            e.prevent_default();
            Msg::Navigate(route.clone())
        })
    }

    pub(crate) fn view_navbar(&self, ctx: &Context<Self>) -> Html {
        html! {
            <nav class="navbar">
                <a href="#" class="brand" onclick={Self::go(ctx, Route::Home)}>{ "Blog" }</a>
                if self.session.is_authenticated() {
                    <a href="#" onclick={Self::go(ctx, Route::Create)}>{ "New post" }</a>
                    <a href="#" onclick={Self::go(ctx, Route::Profile)}>{ "My posts" }</a>
                    if let Some(user) = &self.session.user {
                        <span class="user">{ &user.username }</span>
                    }
                    <button onclick={ctx.link().callback(|_| Msg::Logout)}>{ "Logout" }</button>
                } else {
                    <a href="#" onclick={Self::go(ctx, Route::Login)}>{ "Login" }</a>
                    <a href="#" onclick={Self::go(ctx, Route::Register)}>{ "Register" }</a>
                }
            </nav>
        }
    }

    pub(crate) fn view_notice(&self, ctx: &Context<Self>) -> Html {
        match &self.notice {
            Some(notice) => html! {
                <div class="notice">
                    <span>{ notice }</span>
                    <button onclick={ctx.link().callback(|_| Msg::DismissNotice)}>{ "×" }</button>
                </div>
            },
            None => html! {},
        }
    }

    pub(crate) fn view_home(&self, ctx: &Context<Self>) -> Html {
        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::SearchInput(input.value())
        });

        html! {
            <div class="home">
                <form class="search" onsubmit={submit(ctx, || Msg::Search)}>
                    <input
                        type="search"
                        placeholder="Search by title or author"
                        value={self.search_input.clone()}
                        {oninput}
                    />
                    <button type="submit">{ "Search" }</button>
                </form>

                if self.posts.loading() {
                    <div class="loading">{ "Loading..." }</div>
                }
                if let Some(error) = self.posts.error() {
                    <div class="error">{ error }</div>
                }

                if let Some(page) = self.posts.data() {
                    if page.items.is_empty() {
                        <p>{ "No posts found." }</p>
                    }
                    <div class="posts-list">
                        { for page.items.iter().map(|post| self.view_post_card(ctx, post, false)) }
                    </div>
                    { Self::view_pagination(&page.pagination, ctx.link().callback(Msg::Page)) }
                }
            </div>
        }
    }

    pub(crate) fn view_profile(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="profile">
                if let Some(user) = &self.session.user {
                    <h2>{ format!("{}'s posts", user.username) }</h2>
                    <p class="meta">{ format!("{} · member since {}", user.email, format_date(&user.created_at)) }</p>
                }

                if self.profile.loading() || self.session.user.is_none() {
                    <div class="loading">{ "Loading..." }</div>
                }
                if let Some(error) = self.profile.error() {
                    <div class="error">{ error }</div>
                }

                if let Some(page) = self.profile.data() {
                    if page.items.is_empty() {
                        <p>{ "You have not written anything yet." }</p>
                    }
                    <div class="posts-list">
                        { for page.items.iter().map(|post| self.view_post_card(ctx, post, true)) }
                    </div>
                    { Self::view_pagination(&page.pagination, ctx.link().callback(Msg::ProfilePage)) }
                }
            </div>
        }
    }

    fn view_post_card(&self, ctx: &Context<Self>, post: &Post, with_actions: bool) -> Html {
        let owner = with_actions && self.session.owns(&post.author_id);
        let id = post.id.clone();

        html! {
            <div class="post" key={post.id.clone()}>
                <h3>
                    <a href="#" onclick={Self::go(ctx, Route::Post(post.id.clone()))}>
                        { &post.title }
                    </a>
                </h3>
                <small>
                    { format!("By {} on {}", post.author_username, format_date(&post.created_at)) }
                </small>
                <p>{ excerpt(&post.content, 150) }</p>
                if owner {
                    <div class="post-actions">
                        <button onclick={Self::go(ctx, Route::Edit(post.id.clone()))}>{ "Edit" }</button>
                        <button onclick={ctx.link().callback(move |_| Msg::DeletePost(id.clone()))}>
                            { "Delete" }
                        </button>
                    </div>
                }
            </div>
        }
    }

    fn view_pagination(p: &Pagination, on_page: Callback<i64>) -> Html {
        if p.total_pages <= 1 {
            return html! {};
        }
        let prev = {
            let on_page = on_page.clone();
            let page = p.current_page - 1;
            Callback::from(move |_: MouseEvent| on_page.emit(page))
        };
        let next = {
            let page = p.current_page + 1;
            Callback::from(move |_: MouseEvent| on_page.emit(page))
        };

        html! {
            <div class="pagination">
                <button disabled={!p.has_prev_page} onclick={prev}>{ "Previous" }</button>
                <span>{ format!("Page {} of {}", p.current_page, p.total_pages) }</span>
                <button disabled={!p.has_next_page} onclick={next}>{ "Next" }</button>
            </div>
        }
    }

    pub(crate) fn view_post(&self, ctx: &Context<Self>) -> Html {
        let Some(post) = self.post.data() else {
            return html! { <div class="loading">{ "Loading..." }</div> };
        };
        let owner = self.session.owns(&post.author_id);
        let id = post.id.clone();

        html! {
            <article class="post-detail">
                <h2>{ &post.title }</h2>
                <small>
                    { format!("By {} on {}", post.author_username, format_date(&post.created_at)) }
                    if post.updated_at != post.created_at {
                        { format!(" · updated {}", format_date(&post.updated_at)) }
                    }
                </small>
                if !post.image_url.is_empty() {
                    <img src={post.image_url.clone()} alt={post.title.clone()} />
                }
                <div class="content">{ &post.content }</div>
                if owner {
                    <div class="post-actions">
                        <button onclick={Self::go(ctx, Route::Edit(post.id.clone()))}>{ "Edit" }</button>
                        <button onclick={ctx.link().callback(move |_| Msg::DeletePost(id.clone()))}>
                            { "Delete" }
                        </button>
                    </div>
                }
            </article>
        }
    }

    pub(crate) fn view_post_form(&self, ctx: &Context<Self>) -> Html {
        let editing = matches!(self.route, Route::Edit(_));
        if editing && self.post.data().is_none() {
            return html! { <div class="loading">{ "Loading..." }</div> };
        }

        html! {
            <form class="post-form" onsubmit={submit(ctx, || Msg::SubmitPost)}>
                <h2>{ if editing { "Edit post" } else { "New post" } }</h2>
                { self.view_general_error() }
                { self.view_input(ctx, Field::Title, "title", "Title", "text") }
                { self.view_textarea(ctx, Field::Content, "content", "Content") }
                { self.view_input(ctx, Field::ImageUrl, "imageURL", "Image URL (optional)", "url") }
                <button type="submit" disabled={self.form.submitting}>
                    { if self.form.submitting { "Saving..." } else { "Save" } }
                </button>
            </form>
        }
    }

    pub(crate) fn view_login(&self, ctx: &Context<Self>) -> Html {
        html! {
            <form class="auth-form" onsubmit={submit(ctx, || Msg::SubmitLogin)}>
                <h2>{ "Login" }</h2>
                { self.view_general_error() }
                { self.view_input(ctx, Field::Username, "username", "Username", "text") }
                { self.view_input(ctx, Field::Password, "password", "Password", "password") }
                <button type="submit" disabled={self.form.submitting}>{ "Login" }</button>
            </form>
        }
    }

    pub(crate) fn view_register(&self, ctx: &Context<Self>) -> Html {
        html! {
            <form class="auth-form" onsubmit={submit(ctx, || Msg::SubmitRegister)}>
                <h2>{ "Register" }</h2>
                { self.view_general_error() }
                { self.view_input(ctx, Field::Username, "username", "Username", "text") }
                { self.view_input(ctx, Field::Email, "email", "Email", "email") }
                { self.view_input(ctx, Field::Password, "password", "Password", "password") }
                { self.view_input(ctx, Field::Confirm, "confirmPassword", "Confirm password", "password") }
                <button type="submit" disabled={self.form.submitting}>{ "Register" }</button>
            </form>
        }
    }

    fn view_general_error(&self) -> Html {
        match &self.form.general_error {
            Some(error) => html! { <div class="error">{ error }</div> },
            None => html! {},
        }
    }

    fn view_field_error(&self, key: &str) -> Html {
        match self.form.field_error(key) {
            Some(message) => html! { <div class="field-error">{ message }</div> },
            None => html! {},
        }
    }

    fn view_input(
        &self,
        ctx: &Context<Self>,
        field: Field,
        key: &str,
        label: &'static str,
        kind: &'static str,
    ) -> Html {
        let oninput = ctx.link().callback(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::Input(field, input.value())
        });

        html! {
            <label>
                { label }
                <input type={kind} value={self.fields.get(field).to_string()} {oninput} />
                { self.view_field_error(key) }
            </label>
        }
    }

    fn view_textarea(
        &self,
        ctx: &Context<Self>,
        field: Field,
        key: &str,
        label: &'static str,
    ) -> Html {
        let oninput = ctx.link().callback(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            Msg::Input(field, input.value())
        });

        html! {
            <label>
                { label }
                <textarea rows="12" value={self.fields.get(field).to_string()} {oninput} />
                { self.view_field_error(key) }
            </label>
        }
    }
}
