#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use routegen_common::ProjectConfig;
use routegen_core::{ContractOptions, ContractRegistry, RouteTable, generate, write_client};

const ROUTES: &str = r#"{
  "POST": {
    "/login": "Routes\\LoginRoute",
    "/users/{userId}/posts": "Routes\\CreatePostRoute"
  },
  "GET": {
    "/items/{itemId}/view": "Routes\\ItemViewRoute",
    "/users/{userId}/posts/{postId}": "Routes\\ShowPostRoute"
  }
}"#;

const CONTRACTS: &str = r#"{
  "handlers": {
    "Routes\\LoginRoute": { "implements": ["Framework\\IRouteHandler", "Contracts\\ILoginRoute"] },
    "Routes\\CreatePostRoute": { "implements": ["Framework\\IRouteHandler", "Contracts\\ICreatePostRoute"] },
    "Routes\\ItemViewRoute": { "implements": ["Framework\\IRouteHandler", "Contracts\\IItemViewRoute"] },
    "Routes\\ShowPostRoute": { "implements": ["Framework\\IRouteHandler"] }
  },
  "contracts": {
    "Contracts\\ILoginRoute": { "methods": { "execute": {
      "params": [ { "name": "request", "type": "Models\\LoginRequest" } ],
      "returns": "Models\\LoginResponse" } } },
    "Contracts\\ICreatePostRoute": { "methods": { "execute": {
      "params": [ { "name": "request", "type": "Models\\CreatePostRequest" } ],
      "returns": "Models\\Post" } } },
    "Contracts\\IItemViewRoute": { "methods": { "execute": {
      "params": [ { "name": "request", "type": "Models\\Empty" } ],
      "returns": "Models\\Item" } } }
  },
  "shapes": {
    "Models\\LoginRequest": { "constructor": [
      { "name": "email", "type": "string" },
      { "name": "password", "type": "string" } ] },
    "Models\\LoginResponse": { "constructor": [
      { "name": "token", "type": "string" },
      { "name": "user", "type": "Models\\User" } ] },
    "Models\\User": { "constructor": [
      { "name": "id", "type": "int" },
      { "name": "email", "type": "string" } ] },
    "Models\\CreatePostRequest": { "constructor": [
      { "name": "title", "type": "string" },
      { "name": "body", "type": "string" },
      { "name": "draft", "type": "bool", "optional": true } ] },
    "Models\\Post": { "constructor": [
      { "name": "id", "type": "int" },
      { "name": "author", "type": "Models\\User" },
      { "name": "publishedAt", "type": "?string" } ] },
    "Models\\Empty": {},
    "Models\\Item": { "constructor": [
      { "name": "id", "type": "int" },
      { "name": "price", "type": "float" } ] }
  }
}"#;

fn write_project(root: &Path) -> ProjectConfig {
    let config = ProjectConfig::default();
    let routes = config.routes_path(root);
    let contracts = config.contracts_path(root);
    fs::create_dir_all(routes.parent().unwrap()).unwrap();
    fs::write(&routes, ROUTES).unwrap();
    fs::write(&contracts, CONTRACTS).unwrap();
    config
}

fn generate_into(root: &Path, config: &ProjectConfig) -> String {
    let routes = RouteTable::load(&config.routes_path(root)).unwrap();
    let registry = ContractRegistry::load(&config.contracts_path(root)).unwrap();
    let client = generate(&routes, &registry, &ContractOptions::from(config));
    let output = config.output_path(root);
    write_client(&output, &client.code).unwrap();
    fs::read_to_string(output).unwrap()
}

#[test]
fn generates_client_for_project() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());
    let code = generate_into(dir.path(), &config);

    assert!(code.starts_with("/**\n * Auto-generated TypeScript API Client\n"));

    let order: Vec<_> = [
        "export interface LoginRequest {",
        "export interface User {",
        "export interface LoginResponse {",
        "export interface CreatePostRequest {",
        "export interface Post {",
        "export interface Item {",
    ]
    .iter()
    .map(|needle| code.find(needle).unwrap())
    .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(code.matches("export interface User {").count(), 1);
    assert!(!code.contains("export interface Empty"));

    assert!(code.contains("  publishedAt: string | null;\n"));
    assert!(code.contains("  draft?: boolean;\n"));
    assert!(code.contains("  price: number;\n"));

    assert!(code.contains(
        "  async postUserPosts(data: CreatePostRequest, userId: string): Promise<Post> {\n"
    ));
    assert!(code.contains("fetch(`/users/${userId}/posts`, { method: \"POST\""));
    assert!(code.contains("  async itemView(itemId: string): Promise<Item> {\n"));
    assert!(code.contains("  async postLogin(data: LoginRequest): Promise<LoginResponse> {\n"));
    assert!(code.contains("fetch(\"/login\", "));

    // ShowPostRoute has no contract
    assert!(!code.contains("userPosts("));
    assert!(code.ends_with("export default api;\n"));
}

#[test]
fn regenerating_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());

    let first = generate_into(dir.path(), &config);
    let second = generate_into(dir.path(), &config);
    assert_eq!(first, second);
}

#[test]
fn missing_registry_skips_every_route() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_project(dir.path());
    fs::remove_file(config.contracts_path(dir.path())).unwrap();

    let routes = RouteTable::load(&config.routes_path(dir.path())).unwrap();
    let registry = ContractRegistry::load(&config.contracts_path(dir.path())).unwrap();
    let client = generate(&routes, &registry, &ContractOptions::from(&config));

    assert_eq!(client.report.routes, 4);
    assert_eq!(client.report.bindings, 0);
    assert_eq!(client.report.skipped.len(), 4);
    assert!(client.code.contains("export const api = {};\n"));
}
