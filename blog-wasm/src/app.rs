use crate::api::{ApiClient, ApiError};
use crate::models::*;
use crate::state::{FetchState, FormState, Session};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Post(String),
    Create,
    Edit(String),
    Profile,
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Title,
    Content,
    ImageUrl,
    Username,
    Email,
    Password,
    Confirm,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Content => &self.content,
            Field::ImageUrl => &self.image_url,
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::Confirm => &self.confirm,
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::Content => self.content = value,
            Field::ImageUrl => self.image_url = value,
            Field::Username => self.username = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            Field::Confirm => self.confirm = value,
        }
    }

    fn fill_from(&mut self, post: &Post) {
        self.title = post.title.clone();
        self.content = post.content.clone();
        self.image_url = post.image_url.clone();
    }
}

pub enum Msg {
    // Navigation and session
    Navigate(Route),
    SessionLoaded(Result<User, ApiError>),
    Logout,
    DismissNotice,

    // Lists
    SearchInput(String),
    Search,
    Page(i64),
    ProfilePage(i64),
    PostsLoaded(u64, Result<PostsPage, ApiError>),
    ProfileLoaded(u64, Result<PostsPage, ApiError>),
    PostLoaded(u64, Result<Post, ApiError>),

    // Forms
    Input(Field, String),
    SubmitLogin,
    SubmitRegister,
    SubmitPost,
    AuthDone(Result<AuthResponse, ApiError>),
    PostSaved(Result<Post, ApiError>),

    // Deletion
    DeletePost(String),
    PostDeleted(String, Result<String, ApiError>),
}

pub struct App {
    pub(crate) route: Route,
    pub(crate) session: Session,
    pub(crate) api: ApiClient,

    // Home
    pub(crate) query: ListQuery,
    pub(crate) search_input: String,
    pub(crate) posts: FetchState<PostsPage>,

    // Profile
    pub(crate) profile_page: i64,
    pub(crate) profile: FetchState<PostsPage>,

    // Detail and edit
    pub(crate) post: FetchState<Post>,

    // Forms
    pub(crate) fields: FormFields,
    pub(crate) form: FormState,

    // Banner shown above the current view
    pub(crate) notice: Option<String>,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut app = Self {
            route: Route::Home,
            session: Session::restore(),
            api: ApiClient::new(),
            query: ListQuery {
                page: 1,
                ..Default::default()
            },
            search_input: String::new(),
            posts: FetchState::default(),
            profile_page: 1,
            profile: FetchState::default(),
            post: FetchState::default(),
            fields: FormFields::default(),
            form: FormState::default(),
            notice: None,
        };

        if let Some(token) = app.session.token.clone() {
            let api = app.api.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::SessionLoaded(api.me(Some(&token)).await));
            });
        }

        app.load_posts(ctx);
        app
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Navigate(route) => {
                self.navigate(ctx, route);
                true
            }

            Msg::SessionLoaded(Ok(user)) => {
                log::debug!("Session restored for {}", user.username);
                self.session.user = Some(user);
                match self.route.clone() {
                    Route::Profile => self.load_profile(ctx),
                    Route::Edit(_) => self.check_edit_access(ctx),
                    _ => {}
                }
                true
            }

            Msg::SessionLoaded(Err(e)) => {
                log::warn!("Saved session rejected: {}", e);
                if matches!(e, ApiError::Unauthorized(_)) {
                    self.session.sign_out();
                    self.notice = Some("Your session has expired, please log in again".into());
                    if matches!(self.route, Route::Create | Route::Edit(_) | Route::Profile) {
                        self.navigate(ctx, Route::Login);
                    }
                }
                true
            }

            Msg::Logout => {
                self.session.sign_out();
                self.navigate(ctx, Route::Home);
                true
            }

            Msg::DismissNotice => {
                self.notice = None;
                true
            }

            Msg::SearchInput(value) => {
                self.search_input = value;
                true
            }

            Msg::Search => {
                self.query.search = self.search_input.clone();
                self.query.page = 1;
                self.load_posts(ctx);
                true
            }

            Msg::Page(page) => {
                self.query.page = page;
                self.load_posts(ctx);
                true
            }

            Msg::ProfilePage(page) => {
                self.profile_page = page;
                self.load_profile(ctx);
                true
            }

            Msg::PostsLoaded(ticket, result) => self.posts.finish(ticket, result),

            Msg::ProfileLoaded(ticket, result) => self.profile.finish(ticket, result),

            Msg::PostLoaded(ticket, Err(e)) => {
                if self.post.finish(ticket, Err(e.clone())) {
                    self.redirect_home(ctx, e.to_string());
                    true
                } else {
                    false
                }
            }

            Msg::PostLoaded(ticket, Ok(post)) => {
                if !self.post.finish(ticket, Ok(post)) {
                    return false;
                }
                if matches!(self.route, Route::Edit(_)) {
                    self.check_edit_access(ctx);
                }
                true
            }

            Msg::Input(field, value) => {
                self.fields.set(field, value);
                true
            }

            Msg::SubmitLogin => {
                let req = LoginRequest {
                    username: self.fields.username.trim().to_string(),
                    password: self.fields.password.clone(),
                };
                let errors = blog_common::violations(&req);
                if !errors.is_empty() {
                    self.form.reject(errors);
                    return true;
                }
                self.form.start();

                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::AuthDone(api.login(&req).await));
                });
                true
            }

            Msg::SubmitRegister => {
                let f = &self.fields;
                let req = RegisterRequest {
                    username: f.username.trim().to_string(),
                    email: f.email.trim().to_string(),
                    password: f.password.clone(),
                };
                let errors = req.violations(&f.confirm);
                if !errors.is_empty() {
                    self.form.reject(errors);
                    return true;
                }
                self.form.start();

                let api = self.api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::AuthDone(api.register(&req).await));
                });
                true
            }

            Msg::AuthDone(Ok(response)) => {
                log::info!("Signed in as {}", response.user.username);
                self.session.sign_in(response.token, response.user);
                self.navigate(ctx, Route::Home);
                true
            }

            Msg::AuthDone(Err(e)) => {
                self.form.fail(e);
                true
            }

            Msg::SubmitPost => {
                let f = &self.fields;
                let req = CreatePostRequest {
                    title: f.title.clone(),
                    content: f.content.clone(),
                    image_url: f.image_url.trim().to_string(),
                };
                let errors = blog_common::violations(&req);
                if !errors.is_empty() {
                    self.form.reject(errors);
                    return true;
                }
                self.form.start();

                let api = self.api.clone();
                let link = ctx.link().clone();
                let token = self.session.token.clone();

                match self.route.clone() {
                    Route::Edit(id) => {
                        let req = UpdatePostRequest::from(req);
                        spawn_local(async move {
                            let result = api.update_post(token.as_deref(), &id, &req).await;
                            link.send_message(Msg::PostSaved(result));
                        });
                    }
                    _ => {
                        spawn_local(async move {
                            let result = api.create_post(token.as_deref(), &req).await;
                            link.send_message(Msg::PostSaved(result));
                        });
                    }
                }
                true
            }

            Msg::PostSaved(Ok(post)) => {
                self.form.done();
                self.navigate(ctx, Route::Post(post.id));
                true
            }

            Msg::PostSaved(Err(e)) => {
                if matches!(e, ApiError::NotFound(_)) {
                    self.redirect_home(ctx, e.to_string());
                } else {
                    self.form.fail(e);
                }
                true
            }

            Msg::DeletePost(id) => {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message("Delete this post?").ok())
                    .unwrap_or(false);
                if !confirmed {
                    return false;
                }

                let api = self.api.clone();
                let link = ctx.link().clone();
                let token = self.session.token.clone();
                spawn_local(async move {
                    let result = api.delete_post(token.as_deref(), &id).await;
                    link.send_message(Msg::PostDeleted(id, result));
                });
                false
            }

            Msg::PostDeleted(id, Ok(message)) => {
                for list in [&mut self.posts, &mut self.profile] {
                    if let Some(page) = list.data_mut() {
                        page.remove_post(&id);
                    }
                }
                if self.route == Route::Post(id) {
                    self.redirect_home(ctx, message);
                } else {
                    self.notice = Some(message);
                }
                true
            }

            Msg::PostDeleted(_, Err(e)) => {
                self.notice = Some(e.to_string());
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { self.view_navbar(ctx) }
                { self.view_notice(ctx) }
                {
                    match &self.route {
                        Route::Home => self.view_home(ctx),
                        Route::Post(_) => self.view_post(ctx),
                        Route::Create | Route::Edit(_) => self.view_post_form(ctx),
                        Route::Profile => self.view_profile(ctx),
                        Route::Login => self.view_login(ctx),
                        Route::Register => self.view_register(ctx),
                    }
                }
            </div>
        }
    }
}

impl App {
    fn navigate(&mut self, ctx: &Context<Self>, route: Route) {
        let needs_login = matches!(route, Route::Create | Route::Edit(_) | Route::Profile);
        let route = if needs_login && !self.session.is_authenticated() {
            Route::Login
        } else {
            route
        };

        log::debug!("Navigating to {:?}", route);
        self.route = route.clone();
        self.notice = None;
        self.fields = FormFields::default();
        self.form.done();

        match route {
            Route::Home => self.load_posts(ctx),
            Route::Post(id) | Route::Edit(id) => self.load_post(ctx, id),
            Route::Profile => {
                self.profile_page = 1;
                self.profile.reset();
                self.load_profile(ctx);
            }
            Route::Create | Route::Login | Route::Register => {}
        }
    }

    fn redirect_home(&mut self, ctx: &Context<Self>, notice: String) {
        self.navigate(ctx, Route::Home);
        self.notice = Some(notice);
    }

    /// Edit is only for the author; fills the form once both post and user are known.
    fn check_edit_access(&mut self, ctx: &Context<Self>) {
        let Some(post) = self.post.data().cloned() else {
            return;
        };
        if self.session.user.is_none() {
            return;
        }
        if self.session.owns(&post.author_id) {
            self.fields.fill_from(&post);
        } else {
            self.redirect_home(ctx, "You can only edit your own posts".into());
        }
    }

    fn load_posts(&mut self, ctx: &Context<Self>) {
        let ticket = self.posts.start();
        let api = self.api.clone();
        let query = self.query.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api.list_posts(&query).await;
            link.send_message(Msg::PostsLoaded(ticket, result));
        });
    }

    fn load_profile(&mut self, ctx: &Context<Self>) {
        let Some(user) = &self.session.user else {
            // picked up again once the session is loaded
            return;
        };
        let query = ListQuery {
            page: self.profile_page,
            search: String::new(),
            author: Some(user.id.clone()),
        };

        let ticket = self.profile.start();
        let api = self.api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api.list_posts(&query).await;
            link.send_message(Msg::ProfileLoaded(ticket, result));
        });
    }

    fn load_post(&mut self, ctx: &Context<Self>, id: String) {
        self.post.reset();
        let ticket = self.post.start();
        let api = self.api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api.get_post(&id).await;
            link.send_message(Msg::PostLoaded(ticket, result));
        });
    }
}
