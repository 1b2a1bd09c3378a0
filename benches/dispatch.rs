use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use serde_json::json;
use std::hint::black_box;
use stubrouter::dispatcher::{Dispatcher, HandlerRequest, BODY_ATTRIBUTE};
use stubrouter::router::Router;
use stubrouter::spec::{load_spec_str, SpecFormat};
use stubrouter::{pet_store, RequestId};

fn example_spec() -> &'static str {
    r#"openapi: 3.1.0
info:
  title: Verb Zoo
  version: "1.0.0"
paths:
  "/":
    get:
      operationId: root_handler
      responses:
        "200": { description: OK }
  /zoo/animals:
    get:
      operationId: get_animals
      responses:
        "200": { description: OK }
    post:
      operationId: create_animal
      responses:
        "200": { description: OK }
  /zoo/animals/{id}:
    get:
      operationId: get_animal
      responses:
        "200": { description: OK }
    delete:
      operationId: delete_animal
      responses:
        "204": { description: Gone }
  /zoo/animals/{id}/toys/{toy_id}:
    get:
      operationId: animal_toy
      responses:
        "200": { description: OK }
  /zoo/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}:
    get:
      operationId: habitat_section
      responses:
        "200": { description: OK }
  /fake/outer/string:
    post:
      operationId: fake_outer_string
      responses:
        "200": { description: OK }
"#
}

fn bench_route_match(c: &mut Criterion) {
    let (descriptors, _) =
        load_spec_str(example_spec(), SpecFormat::Yaml).expect("failed to load spec");
    let router = Router::new(descriptors).expect("failed to build router");
    c.bench_function("route_match", |b| {
        let test_paths = [
            (Method::GET, "/zoo/animals/123"),
            (Method::GET, "/zoo/animals/123/toys/456"),
            (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
            (Method::POST, "/fake/outer/string"),
            (Method::GET, "/does/not/exist"),
        ];
        b.iter(|| {
            for (method, path) in &test_paths {
                black_box(router.route(method.clone(), path));
            }
        })
    });
}

fn bench_stub_dispatch(c: &mut Criterion) {
    let (descriptors, _) =
        load_spec_str(example_spec(), SpecFormat::Yaml).expect("failed to load spec");
    let router = Router::new(descriptors.clone()).expect("failed to build router");
    let mut dispatcher = Dispatcher::new();
    pet_store::registry::register_all(&mut dispatcher);
    dispatcher.register_missing_as_stubs(&descriptors);

    c.bench_function("stub_dispatch_typed", |b| {
        b.iter(|| {
            let route_match = router
                .route(Method::POST, "/fake/outer/string")
                .expect("route exists");
            let mut req =
                HandlerRequest::from_route_match(route_match, "/fake/outer/string", RequestId::new());
            req.set_attribute(BODY_ATTRIBUTE, json!({"key": "value"}));
            black_box(dispatcher.dispatch(&req))
        })
    });

    c.bench_function("stub_dispatch_default", |b| {
        b.iter(|| {
            let route_match = router
                .route(Method::GET, "/zoo/animals/42")
                .expect("route exists");
            let req = HandlerRequest::from_route_match(route_match, "/zoo/animals/42", RequestId::new());
            black_box(dispatcher.dispatch(&req))
        })
    });
}

criterion_group!(benches, bench_route_match, bench_stub_dispatch);
criterion_main!(benches);
