use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use std::sync::Arc;

use catalog_app::{validation::escape, MOUNT_PATH};
use catalog_db::{DocumentId, DocumentStore, MemoryStore, StoreHandle};
use catalog_kernel::settings::{Environment, Settings};
use serde_json::json;
use tower::ServiceExt;

struct Page {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

fn router_for(store: &StoreHandle, settings: &Settings) -> Router {
    let registry = catalog_app::build_registry(store);
    catalog_http::build_router(&registry, settings, MOUNT_PATH)
}

async fn setup() -> (Router, StoreHandle) {
    let store = catalog_db::connect(None, escape).await.unwrap();
    (router_for(&store, &Settings::default()), store)
}

async fn send(app: &Router, request: Request<Body>) -> Page {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    Page {
        status,
        location,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

async fn get(app: &Router, uri: &str) -> Page {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, form: &str) -> Page {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
    )
    .await
}

async fn create_author(app: &Router, form: &str) -> String {
    let page = post(app, "/catalog/author/create", form).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    page.location.unwrap()
}

async fn create_genre(app: &Router, name: &str) -> String {
    let page = post(app, "/catalog/genre/create", &format!("name={name}")).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    page.location.unwrap()
}

fn id_from(url: &str) -> DocumentId {
    url.rsplit('/').next().and_then(DocumentId::parse).unwrap()
}

async fn add_book(store: &StoreHandle, title: &str, author: DocumentId, genres: &[DocumentId]) -> DocumentId {
    let body = json!({
        "title": title,
        "author": author,
        "summary": format!("Summary of {title}"),
        "isbn": "9780000000000",
        "genre": genres,
    });
    let Some(body) = body.as_object().cloned() else {
        panic!("book body must be an object");
    };
    store.insert("books", body).await.unwrap().id
}

#[tokio::test]
async fn root_redirects_to_catalog_home() {
    let (app, _store) = setup().await;

    let page = get(&app, "/").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/catalog"));

    let health = get(&app, "/healthz").await;
    assert_eq!(health.status, StatusCode::OK);
}

#[tokio::test]
async fn home_shows_record_counts() {
    let (app, _store) = setup().await;
    create_author(&app, "first_name=Isaac&family_name=Asimov").await;
    create_genre(&app, "Fantasy").await;
    create_genre(&app, "Poetry").await;

    let page = get(&app, "/catalog").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<strong>Books:</strong> 0"));
    assert!(page.body.contains("<strong>Authors:</strong> 1"));
    assert!(page.body.contains("<strong>Genres:</strong> 2"));
}

#[tokio::test]
async fn created_author_is_shown_on_detail_page() {
    let (app, _store) = setup().await;
    let url = create_author(
        &app,
        "first_name=Charlotte&family_name=Bronte&date_of_birth=1816-04-21&date_of_death=1855-03-31",
    )
    .await;
    assert!(url.starts_with("/catalog/author/"));

    let page = get(&app, &url).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Bronte, Charlotte"));
    assert!(page.body.contains("Apr 21, 1816 - Mar 31, 1855"));
    assert!(page.body.contains("This author has no books."));

    let list = get(&app, "/catalog/authors").await;
    assert!(list.body.contains("Bronte, Charlotte"));
}

#[tokio::test]
async fn empty_author_names_report_both_errors_without_writing() {
    let (app, store) = setup().await;

    let page = post(&app, "/catalog/author/create", "first_name=&family_name=+").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("First name must be specified."));
    assert!(page.body.contains("Family name must be specified."));
    assert_eq!(store.count("authors").await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_author_input_is_echoed_sanitized() {
    let (app, store) = setup().await;

    let page = post(
        &app,
        "/catalog/author/create",
        "first_name=Conan&family_name=O%27Brien&date_of_birth=not-a-date",
    )
    .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Family name has non-alphanumeric characters."));
    assert!(page.body.contains("Invalid date of birth"));
    assert!(page.body.contains("value=\"O&#x27;Brien\""));
    assert_eq!(store.count("authors").await.unwrap(), 0);
}

#[tokio::test]
async fn update_form_is_prefilled() {
    let (app, _store) = setup().await;
    let url = create_author(
        &app,
        "first_name=Jane&family_name=Austen&date_of_birth=1775-12-16",
    )
    .await;

    let page = get(&app, &format!("{url}/update")).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Update Author"));
    assert!(page.body.contains("value=\"Jane\""));
    assert!(page.body.contains("value=\"Austen\""));
    assert!(page.body.contains("value=\"1775-12-16\""));
}

#[tokio::test]
async fn resubmitting_an_update_is_idempotent() {
    let (app, store) = setup().await;
    let form = "first_name=Mary&family_name=Shelley&date_of_birth=1797-08-30";
    let url = create_author(&app, form).await;

    for _ in 0..2 {
        let page = post(&app, &format!("{url}/update"), form).await;
        assert_eq!(page.status, StatusCode::SEE_OTHER);
        assert_eq!(page.location.as_deref(), Some(url.as_str()));
    }

    assert_eq!(store.count("authors").await.unwrap(), 1);
    let page = get(&app, &url).await;
    assert!(page.body.contains("Shelley, Mary"));
}

#[tokio::test]
async fn update_keeps_the_id_and_replaces_fields() {
    let (app, _store) = setup().await;
    let url = create_author(&app, "first_name=Mary&family_name=Godwin&date_of_birth=1797-08-30").await;

    let page = post(&app, &format!("{url}/update"), "first_name=Mary&family_name=Shelley").await;
    assert_eq!(page.location.as_deref(), Some(url.as_str()));

    let detail = get(&app, &url).await;
    assert!(detail.body.contains("Shelley, Mary"));
    assert!(!detail.body.contains("Godwin"));
    assert!(!detail.body.contains("1797"));
}

#[tokio::test]
async fn author_with_books_cannot_be_deleted() {
    let (app, store) = setup().await;
    let url = create_author(&app, "first_name=Patrick&family_name=Rothfuss").await;
    add_book(&store, "The Name of the Wind", id_from(&url), &[]).await;

    let confirm = get(&app, &format!("{url}/delete")).await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert!(confirm
        .body
        .contains("Delete the following books before attempting to delete this author."));
    assert!(confirm.body.contains("The Name of the Wind"));

    let refused = post(&app, &format!("{url}/delete"), "").await;
    assert_eq!(refused.status, StatusCode::OK);
    assert!(refused.body.contains("The Name of the Wind"));

    assert_eq!(get(&app, &url).await.status, StatusCode::OK);
    assert_eq!(store.count("authors").await.unwrap(), 1);
}

#[tokio::test]
async fn author_without_books_is_deleted() {
    let (app, store) = setup().await;
    let url = create_author(&app, "first_name=Bob&family_name=Billings").await;

    let confirm = get(&app, &format!("{url}/delete")).await;
    assert!(confirm.body.contains("Do you really want to delete this Author?"));

    let page = post(&app, &format!("{url}/delete"), &format!("authorid={}", id_from(&url))).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/catalog/authors"));

    assert_eq!(get(&app, &url).await.status, StatusCode::NOT_FOUND);
    assert_eq!(store.count("authors").await.unwrap(), 0);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let (app, _store) = setup().await;
    let missing = DocumentId::generate();

    let page = get(&app, &format!("/catalog/author/{missing}")).await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("Author not found"));

    let page = get(&app, "/catalog/genre/not-an-id").await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("Genre not found"));

    let page = get(&app, &format!("/catalog/book/{missing}")).await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("Book not found"));

    assert_eq!(get(&app, "/catalog/nowhere").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forms_for_missing_records_redirect_to_lists() {
    let (app, _store) = setup().await;
    let missing = DocumentId::generate();

    for (uri, list) in [
        (format!("/catalog/author/{missing}/update"), "/catalog/authors"),
        (format!("/catalog/author/{missing}/delete"), "/catalog/authors"),
        (format!("/catalog/genre/{missing}/update"), "/catalog/genres"),
        (format!("/catalog/genre/{missing}/delete"), "/catalog/genres"),
    ] {
        let page = get(&app, &uri).await;
        assert_eq!(page.status, StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(page.location.as_deref(), Some(list), "GET {uri}");
    }

    let page = post(&app, &format!("/catalog/author/{missing}/delete"), "").await;
    assert_eq!(page.location.as_deref(), Some("/catalog/authors"));
}

#[tokio::test]
async fn short_genre_name_is_rejected() {
    let (app, store) = setup().await;

    let page = post(&app, "/catalog/genre/create", "name=ab").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("genre must contain atleast 3 characcters"));
    assert!(page.body.contains("value=\"ab\""));
    assert_eq!(store.count("genres").await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_genre_redirects_to_existing_one() {
    let (app, store) = setup().await;
    let url = create_genre(&app, "Fantasy").await;

    let page = post(&app, "/catalog/genre/create", "name=fantasy").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some(url.as_str()));
    assert_eq!(store.count("genres").await.unwrap(), 1);

    let poesie = create_genre(&app, "Poesie").await;
    let page = post(&app, "/catalog/genre/create", "name=PO%C3%89SIE").await;
    assert_eq!(page.location.as_deref(), Some(poesie.as_str()));
    assert_eq!(store.count("genres").await.unwrap(), 2);
}

#[tokio::test]
async fn genre_update_rejects_a_name_taken_by_another_genre() {
    let (app, _store) = setup().await;
    create_genre(&app, "Fantasy").await;
    let poetry = create_genre(&app, "Poetry").await;

    let page = post(&app, &format!("{poetry}/update"), "name=FANTASY").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("already exists"));

    let same = post(&app, &format!("{poetry}/update"), "name=poetry").await;
    assert_eq!(same.status, StatusCode::SEE_OTHER);
    assert_eq!(same.location.as_deref(), Some(poetry.as_str()));
}

#[tokio::test]
async fn tagged_genre_cannot_be_deleted() {
    let (app, store) = setup().await;
    let author = create_author(&app, "first_name=Ben&family_name=Bova").await;
    let genre = create_genre(&app, "Science Fiction").await;
    add_book(&store, "Death Wave", id_from(&author), &[id_from(&genre)]).await;

    let refused = post(&app, &format!("{genre}/delete"), "").await;
    assert_eq!(refused.status, StatusCode::OK);
    assert!(refused.body.contains("Death Wave"));
    assert_eq!(store.count("genres").await.unwrap(), 1);

    let detail = get(&app, &genre).await;
    assert!(detail.body.contains("Death Wave"));
}

#[tokio::test]
async fn book_pages_resolve_author_and_genres() {
    let (app, store) = setup().await;
    let author = create_author(&app, "first_name=Ben&family_name=Bova").await;
    let scifi = create_genre(&app, "Science Fiction").await;
    let space = create_genre(&app, "Space Opera").await;
    let book = add_book(
        &store,
        "Apes and Angels",
        id_from(&author),
        &[id_from(&scifi), id_from(&space)],
    )
    .await;

    let list = get(&app, "/catalog/books").await;
    assert_eq!(list.status, StatusCode::OK);
    assert!(list.body.contains("Apes and Angels"));
    assert!(list.body.contains("Bova, Ben"));

    let detail = get(&app, &format!("/catalog/book/{book}")).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Bova, Ben"));
    assert!(detail.body.contains("Science Fiction"));
    assert!(detail.body.contains("Space Opera"));
}

#[tokio::test]
async fn delete_rechecks_books_added_after_confirmation() {
    let (app, store) = setup().await;
    let url = create_author(&app, "first_name=Ursula&family_name=LeGuin").await;

    let confirm = get(&app, &format!("{url}/delete")).await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert!(confirm.body.contains("Do you really want to delete this Author?"));

    add_book(&store, "The Dispossessed", id_from(&url), &[]).await;

    let refused = post(&app, &format!("{url}/delete"), &format!("authorid={}", id_from(&url))).await;
    assert_eq!(refused.status, StatusCode::OK);
    assert!(refused
        .body
        .contains("Delete the following books before attempting to delete this author."));
    assert!(refused.body.contains("The Dispossessed"));
    assert_eq!(store.count("authors").await.unwrap(), 1);
}

#[tokio::test]
async fn closed_store_answers_500_with_local_detail() {
    let (app, store) = setup().await;
    store.close().await.unwrap();

    let pages = [
        get(&app, "/catalog/authors").await,
        post(&app, "/catalog/genre/create", "name=Fantasy").await,
    ];
    for page in pages {
        assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(page.body.contains("An internal server error occurred"));
        assert!(page.body.contains("store is closed"));
    }
}

#[tokio::test]
async fn production_error_pages_hide_detail() {
    let store = catalog_db::connect(None, escape).await.unwrap();
    let settings = Settings {
        environment: Environment::Production,
        ..Settings::default()
    };
    let app = router_for(&store, &settings);
    store.close().await.unwrap();

    let page = get(&app, "/catalog/genres").await;
    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.body.contains("An internal server error occurred"));
    assert!(!page.body.contains("store is closed"));
}

#[tokio::test]
async fn seeded_text_is_escaped_like_form_input() {
    let memory = Arc::new(MemoryStore::new());
    let genre = DocumentId::generate();
    memory
        .seed(
            json!({"genres": [{"id": genre.to_string(), "name": "Sci & <Fi>"}]}),
            escape,
        )
        .await
        .unwrap();
    let store: StoreHandle = memory;
    let app = router_for(&store, &Settings::default());

    let list = get(&app, "/catalog/genres").await;
    assert!(list.body.contains("Sci &amp; &lt;Fi&gt;"));
    assert!(!list.body.contains("<Fi>"));

    let page = post(&app, "/catalog/genre/create", "name=sci+%26+%3Cfi%3E").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(
        page.location.as_deref(),
        Some(format!("/catalog/genre/{genre}").as_str())
    );
    assert_eq!(store.count("genres").await.unwrap(), 1);
}
