use chrono::Utc;
use docrepo::common::Value;
use docrepo::doc;
use docrepo::query::{PageQuery, SortType};
use docrepo_int_test::test_util::{create_repository, seed_users, User};

#[ctor::ctor]
fn init_logger() {
    colog::init();
}

#[test]
fn test_page_with_filter_sort_and_paging() {
    let repository = create_repository();
    let users = seed_users(&repository, 10).unwrap();

    // ages 20..=29; keep the ones over 22, newest first, two per page
    let query = PageQuery::new()
        .filters(doc! { "age": doc! { "GT": 22i64 } })
        .page(2, 2)
        .sort_by("age", SortType::Dsc);
    let page = repository.page(&users[0], &query).unwrap();

    assert_eq!(page.total, 7);
    assert_eq!(page.page_no, 2);
    assert_eq!(page.page_size, 2);
    let ages: Vec<_> = page.items.iter().map(|u| u.age).collect();
    assert_eq!(ages, vec![27, 26]);
}

#[test]
fn test_page_normalizes_out_of_range_paging() {
    let repository = create_repository();
    let users = seed_users(&repository, 3).unwrap();

    let query = PageQuery::new().page(0, -5);
    let page = repository.page(&users[0], &query).unwrap();

    assert_eq!(page.page_no, 1);
    assert_eq!(page.page_size, 20);
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 3);
}

#[test]
fn test_page_with_empty_filters_matches_everything() {
    let repository = create_repository();
    let users = seed_users(&repository, 5).unwrap();

    let page = repository.page(&users[0], &PageQuery::new()).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 5);
}

#[test]
fn test_page_with_composed_filter() {
    let repository = create_repository();
    let users = seed_users(&repository, 10).unwrap();

    let query = PageQuery::new().filters(doc! {
        "AND": vec![
            Value::Document(doc! { "age": doc! { "GT": 21i64 } }),
            Value::Document(doc! { "age": doc! { "LT": 25i64 } }),
        ],
    });
    let page = repository.page(&users[0], &query).unwrap();

    assert_eq!(page.total, 3);
    let mut ages: Vec<_> = page.items.iter().map(|u| u.age).collect();
    ages.sort();
    assert_eq!(ages, vec![22, 23, 24]);
}

#[test]
fn test_page_with_or_filter() {
    let repository = create_repository();
    let users = seed_users(&repository, 6).unwrap();

    let query = PageQuery::new().filters(doc! {
        "OR": vec![
            Value::Document(doc! { "name": doc! { "EQ": "user0" } }),
            Value::Document(doc! { "name": doc! { "EQ": "user5" } }),
        ],
    });
    let page = repository.page(&users[0], &query).unwrap();
    assert_eq!(page.total, 2);
}

#[test]
fn test_page_with_like_filter() {
    let repository = create_repository();
    let users = seed_users(&repository, 12).unwrap();

    // user1, user10, user11
    let query = PageQuery::new().filters(doc! { "name": doc! { "LIKE": "^user1" } });
    let page = repository.page(&users[0], &query).unwrap();
    assert_eq!(page.total, 3);
}

#[test]
fn test_page_with_membership_filter() {
    let repository = create_repository();
    let users = seed_users(&repository, 5).unwrap();

    let query = PageQuery::new().filters(doc! {
        "age": doc! { "IN": vec![20i64, 23] },
    });
    let page = repository.page(&users[0], &query).unwrap();
    assert_eq!(page.total, 2);

    let query = PageQuery::new().filters(doc! {
        "age": doc! { "NOT_IN": vec![20i64, 23] },
    });
    let page = repository.page(&users[0], &query).unwrap();
    assert_eq!(page.total, 3);
}

#[test]
fn test_temporal_filter_accepts_epoch_seconds_and_millis() {
    let repository = create_repository();

    // three users created one hour apart, ending now
    let now_secs = Utc::now().timestamp();
    let mut first = None;
    for i in 0..3i64 {
        let created = docrepo::common::datetime_from_secs(now_secs - i * 3600);
        let user = User::new(i, &format!("u{}", i), 30).created_at(created);
        repository.insert(&user).unwrap();
        first.get_or_insert(user);
    }
    let model = first.unwrap();

    // a bound 90 minutes back selects the two newest
    let bound_secs = now_secs - 5400;
    let query = PageQuery::new().filters(doc! {
        "created_at": doc! { "GTE": bound_secs },
    });
    let page = repository.page(&model, &query).unwrap();
    assert_eq!(page.total, 2);

    // the same bound in milliseconds selects the same documents
    let query = PageQuery::new().filters(doc! {
        "created_at": doc! { "GTE": bound_secs * 1000 },
    });
    let page = repository.page(&model, &query).unwrap();
    assert_eq!(page.total, 2);
}

#[test]
fn test_multi_key_sort_order() {
    let repository = create_repository();
    let a = User::new(1, "same", 30);
    let b = User::new(2, "same", 25);
    let c = User::new(3, "other", 25);
    for user in [&a, &b, &c] {
        repository.insert(user).unwrap();
    }

    let query = PageQuery::new()
        .sort_by("age", SortType::Asc)
        .sort_by("name", SortType::Dsc);
    let page = repository.page(&a, &query).unwrap();

    let ids: Vec<_> = page.items.iter().map(|u| u.user_id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn test_page_query_from_wire_json() {
    let repository = create_repository();
    let users = seed_users(&repository, 10).unwrap();

    let json = r#"{
        "filters": { "age": { "GTE": 25 } },
        "pageNo": 1,
        "pageSize": 3,
        "sort": [ { "property": "age", "type": "ASC" } ]
    }"#;
    let query: PageQuery = serde_json::from_str(json).unwrap();
    let page = repository.page(&users[0], &query).unwrap();

    assert_eq!(page.total, 5);
    let ages: Vec<_> = page.items.iter().map(|u| u.age).collect();
    assert_eq!(ages, vec![25, 26, 27]);
}

#[test]
fn test_unrecognized_operator_drops_constraint() {
    let repository = create_repository();
    let users = seed_users(&repository, 4).unwrap();

    // the unsupported token is dropped, so only the GTE bound applies
    let query = PageQuery::new().filters(doc! {
        "age": doc! { "GTE": 21i64, "MATCH": 999i64 },
    });
    let page = repository.page(&users[0], &query).unwrap();
    assert_eq!(page.total, 3);
}

#[test]
fn test_last_page_is_short() {
    let repository = create_repository();
    let users = seed_users(&repository, 5).unwrap();

    let query = PageQuery::new().page(2, 3).sort_by("age", SortType::Asc);
    let page = repository.page(&users[0], &query).unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    let ages: Vec<_> = page.items.iter().map(|u| u.age).collect();
    assert_eq!(ages, vec![23, 24]);
}
