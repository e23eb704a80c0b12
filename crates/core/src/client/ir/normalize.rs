//! Normalization from route table and contract registry to API IR.
//!
//! This module handles everything that depends on the registry:
//! - Contract resolution per route (unresolvable routes are skipped)
//! - Shape expansion, dependencies first and each identifier once
//! - Binding naming and path parameter extraction

use std::collections::{HashMap, HashSet};

use routegen_common::ProjectConfig;
use tracing::{debug, warn};

use super::api::{
    ApiIR, BINDING_LOCALS, BODY_PARAM, BindingIR, FieldIR, ShapeIR, SkipReason, SkippedRoute,
    UrlPart,
};
use super::utils::{capitalize_first, lowercase_first, sanitize_ts_identifier, short_name};
use crate::registry::{ContractRegistry, ShapeField};
use crate::routes::{HttpMethod, RouteTable};

/// How a handler's contract is located in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractOptions {
    /// Contract carried by every handler, never selected as the route contract
    pub marker_contract: String,
    /// Contract method declaring the request/response pair
    pub entry_method: String,
}

impl Default for ContractOptions {
    fn default() -> Self {
        Self::from(&ProjectConfig::default())
    }
}

impl From<&ProjectConfig> for ContractOptions {
    fn from(config: &ProjectConfig) -> Self {
        Self {
            marker_contract: config.marker_contract.clone(),
            entry_method: config.entry_method.clone(),
        }
    }
}

/// Normalize a route table into API IR.
///
/// Routes whose contract cannot be resolved are recorded in [`ApiIR::skipped`]
/// and generation carries on.
///
/// Binding names must be unique on the client object, so a route whose name
/// is already taken by an earlier route is skipped as well, with
/// [`SkipReason::DuplicateBinding`]. `POST /posts` and `GET /posts` both name
/// `posts`, and only the first one declared gets a binding.
pub fn normalize_routes(
    routes: &RouteTable,
    registry: &ContractRegistry,
    options: &ContractOptions,
) -> ApiIR {
    let mut collector = ShapeCollector::new(registry);
    let mut bindings: Vec<BindingIR> = Vec::new();
    let mut skipped = Vec::new();
    let mut names = HashSet::new();

    for route in routes.iter() {
        let types = match registry.resolve_contract(
            &route.handler,
            &options.marker_contract,
            &options.entry_method,
        ) {
            Ok(types) => types,
            Err(err) => {
                warn!(
                    method = %route.method,
                    path = %route.path,
                    handler = %route.handler,
                    "{err} for {}, skipping route.",
                    route.path
                );
                skipped.push(SkippedRoute {
                    method: route.method,
                    path: route.path.clone(),
                    reason: SkipReason::from(err),
                });
                continue;
            }
        };

        let name = binding_name(&route.path, route.method);
        if !names.insert(name.clone()) {
            warn!(
                method = %route.method,
                path = %route.path,
                binding = %name,
                "Binding name already used by an earlier route, skipping route."
            );
            skipped.push(SkippedRoute {
                method: route.method,
                path: route.path.clone(),
                reason: SkipReason::DuplicateBinding(name),
            });
            continue;
        }

        debug!(
            path = %route.path,
            contract = %types.contract,
            request = %types.request,
            response = %types.response,
            "Resolved route contract."
        );

        collector.collect(&types.request);
        collector.collect(&types.response);

        let body = route
            .method
            .has_body()
            .then(|| short_name(&types.request).to_string());
        let mut url = url_parts(&route.path);
        let path_params = bind_path_params(&mut url, body.is_some());

        bindings.push(BindingIR {
            name,
            method: route.method,
            path: route.path.clone(),
            url,
            path_params,
            body,
            response: short_name(&types.response).to_string(),
        });
    }

    ApiIR {
        shapes: collector.finish(),
        bindings,
        skipped,
    }
}

// =============================================================================
// Shape expansion
// =============================================================================

/// Depth-first shape expansion shared by every route of a run.
///
/// Identifiers enter `seen` before their fields are visited, so a cycle stops
/// at the second visit. Shapes are emitted post-order.
struct ShapeCollector<'a> {
    registry: &'a ContractRegistry,
    seen: HashSet<String>,
    shapes: Vec<ShapeIR>,
}

/// A shape whose fields are being walked.
struct Frame {
    identifier: String,
    fields: Vec<ShapeField>,
    cursor: usize,
}

impl<'a> ShapeCollector<'a> {
    fn new(registry: &'a ContractRegistry) -> Self {
        Self {
            registry,
            seen: HashSet::new(),
            shapes: Vec::new(),
        }
    }

    fn frame(&self, identifier: &str) -> Frame {
        Frame {
            identifier: identifier.to_string(),
            fields: self.registry.reflect_shape(identifier),
            cursor: 0,
        }
    }

    fn collect(&mut self, root: &str) {
        if !self.seen.insert(root.to_string()) {
            return;
        }

        let mut stack = vec![self.frame(root)];
        while let Some(top) = stack.last_mut() {
            if let Some(field) = top.fields.get(top.cursor) {
                top.cursor += 1;
                if field.is_nested_shape && !self.seen.contains(&field.declared_type) {
                    let nested = field.declared_type.clone();
                    self.seen.insert(nested.clone());
                    let frame = self.frame(&nested);
                    stack.push(frame);
                }
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            self.finish_shape(done);
        }
    }

    fn finish_shape(&mut self, frame: Frame) {
        if frame.fields.is_empty() {
            debug!(
                shape = %frame.identifier,
                "Shape has no constructor fields, no interface emitted."
            );
            return;
        }

        let fields = frame
            .fields
            .into_iter()
            .map(|field| FieldIR {
                nested_shape: field
                    .is_nested_shape
                    .then(|| short_name(&field.declared_type).to_string()),
                name: field.name,
                declared_type: field.declared_type,
                nullable: field.nullable,
                optional: field.optional,
            })
            .collect();

        self.shapes.push(ShapeIR {
            name: short_name(&frame.identifier).to_string(),
            identifier: frame.identifier,
            fields,
        });
    }

    fn finish(self) -> Vec<ShapeIR> {
        self.shapes
    }
}

// =============================================================================
// Naming and URLs
// =============================================================================

/// Synthesize the client binding name for a route.
///
/// Placeholder segments are dropped, the rest is camelCased on `-` and `_`.
/// Non-GET routes get the lower-cased method as prefix unless the name
/// already starts with it, so `POST /posts` stays `posts`.
pub fn binding_name(path: &str, method: HttpMethod) -> String {
    let mut joined = String::new();
    for segment in path.trim_matches('/').split('/') {
        if segment.is_empty() || is_placeholder(segment) {
            continue;
        }
        for word in segment.split(['-', '_']) {
            joined.push_str(&capitalize_first(word));
        }
    }

    joined.retain(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    let mut name = lowercase_first(&joined);

    let verb = method.as_str().to_ascii_lowercase();
    if name.is_empty() {
        return verb;
    }
    if method != HttpMethod::Get && !name.starts_with(&verb) {
        name = format!("{verb}{}", capitalize_first(&name));
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

fn is_placeholder(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Split a path template into static text and parameters.
///
/// Parameter names are made TypeScript-safe. An empty `{}` or an unclosed
/// brace is kept as literal text.
pub fn url_parts(path: &str) -> Vec<UrlPart> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut placeholder: Option<String> = None;

    for c in path.chars() {
        match placeholder.as_mut() {
            None => {
                if c == '{' {
                    placeholder = Some(String::new());
                } else {
                    current.push(c);
                }
            }
            Some(name) => match c {
                '}' => {
                    if name.is_empty() {
                        current.push_str("{}");
                    } else {
                        if !current.is_empty() {
                            parts.push(UrlPart::Static(std::mem::take(&mut current)));
                        }
                        parts.push(UrlPart::Param(sanitize_ts_identifier(name)));
                    }
                    placeholder = None;
                }
                '{' => {
                    // restart at the innermost brace
                    current.push('{');
                    current.push_str(name);
                    name.clear();
                }
                _ => name.push(c),
            },
        }
    }

    if let Some(name) = placeholder {
        current.push('{');
        current.push_str(&name);
    }
    if !current.is_empty() {
        parts.push(UrlPart::Static(current));
    }
    parts
}

/// Name the parameters of a parsed path template, renaming them in place.
///
/// Names never clash with the body parameter, the binding locals or each
/// other; a clash gets a numeric suffix (`data` -> `data2`). A placeholder
/// used twice stays a single parameter.
fn bind_path_params(url: &mut [UrlPart], has_body: bool) -> Vec<String> {
    let mut taken: HashSet<String> = BINDING_LOCALS.iter().map(|s| s.to_string()).collect();
    if has_body {
        taken.insert(BODY_PARAM.to_string());
    }
    let mut assigned: HashMap<String, String> = HashMap::new();
    let mut params = Vec::new();

    for part in url.iter_mut() {
        let UrlPart::Param(name) = part else {
            continue;
        };
        if let Some(existing) = assigned.get(name.as_str()) {
            *name = existing.clone();
            continue;
        }
        let unique = unique_name(name, &taken);
        taken.insert(unique.clone());
        assigned.insert(name.clone(), unique.clone());
        params.push(unique.clone());
        *name = unique;
    }
    params
}

fn unique_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::registry::ResolveError;

    fn registry(json: &str) -> ContractRegistry {
        ContractRegistry::from_json(json).unwrap()
    }

    const BLOG: &str = r#"{
  "handlers": {
    "Routes\\CreatePostRoute": { "implements": ["Framework\\IRouteHandler", "Contracts\\ICreatePost"] },
    "Routes\\ListPostsRoute": { "implements": ["Framework\\IRouteHandler", "Contracts\\IListPosts"] },
    "Routes\\AboutRoute": { "implements": ["Framework\\IRouteHandler"] }
  },
  "contracts": {
    "Contracts\\ICreatePost": { "methods": { "execute": {
      "params": [ { "name": "request", "type": "Models\\CreatePostRequest" } ],
      "returns": "Models\\PostResponse" } } },
    "Contracts\\IListPosts": { "methods": { "execute": {
      "params": [ { "name": "request", "type": "Models\\ListPostsRequest" } ],
      "returns": "Models\\PostResponse" } } }
  },
  "shapes": {
    "Models\\CreatePostRequest": { "constructor": [
      { "name": "title", "type": "string" },
      { "name": "author", "type": "Models\\Author" } ] },
    "Models\\ListPostsRequest": {},
    "Models\\PostResponse": { "constructor": [
      { "name": "id", "type": "int" },
      { "name": "author", "type": "?Models\\Author" } ] },
    "Models\\Author": { "constructor": [ { "name": "name", "type": "string" } ] }
  }
}"#;

    #[test]
    fn test_binding_name_examples() {
        assert_eq!(binding_name("/login", HttpMethod::Get), "login");
        assert_eq!(binding_name("/items/{itemId}/view", HttpMethod::Get), "itemView");
        assert_eq!(
            binding_name("/users/{userId}/posts", HttpMethod::Post),
            "postUserPosts"
        );
        assert_eq!(binding_name("/login", HttpMethod::Post), "postLogin");
        assert_eq!(binding_name("/posts", HttpMethod::Post), "posts");
    }

    #[test]
    fn test_binding_name_edge_cases() {
        assert_eq!(binding_name("/", HttpMethod::Get), "get");
        assert_eq!(binding_name("/{id}", HttpMethod::Delete), "delete");
        assert_eq!(
            binding_name("/user-profile/avatar_url", HttpMethod::Get),
            "userProfileAvatarUrl"
        );
        assert_eq!(binding_name("/Admin/users", HttpMethod::Get), "adminUsers");
        assert_eq!(binding_name("/users/{id}", HttpMethod::Put), "putUsers");
        assert_eq!(binding_name("/2fa", HttpMethod::Get), "_2fa");
        assert_eq!(binding_name("/@Admin/users", HttpMethod::Get), "adminUsers");
    }

    #[test]
    fn test_binding_name_is_pure() {
        let first = binding_name("/a/{b}/c-d", HttpMethod::Patch);
        let second = binding_name("/a/{b}/c-d", HttpMethod::Patch);
        assert_eq!(first, second);
        assert_eq!(first, "patchACD");
    }

    #[test]
    fn test_url_parts() {
        assert_eq!(
            url_parts("/users/{userId}/posts/{postId}"),
            vec![
                UrlPart::Static("/users/".into()),
                UrlPart::Param("userId".into()),
                UrlPart::Static("/posts/".into()),
                UrlPart::Param("postId".into()),
            ]
        );
        assert_eq!(url_parts("/login"), vec![UrlPart::Static("/login".into())]);
        assert_eq!(
            url_parts("/a/{}/b/{open"),
            vec![UrlPart::Static("/a/{}/b/{open".into())]
        );
        assert_eq!(
            url_parts("/items/{item-id}"),
            vec![
                UrlPart::Static("/items/".into()),
                UrlPart::Param("itemId".into()),
            ]
        );
    }

    fn params_of(path: &str, has_body: bool) -> (Vec<String>, Vec<UrlPart>) {
        let mut url = url_parts(path);
        let params = bind_path_params(&mut url, has_body);
        (params, url)
    }

    #[test]
    fn test_path_param_clashing_with_body() {
        let (params, url) = params_of("/uploads/{data}", true);
        assert_eq!(params, vec!["data2".to_string()]);
        assert_eq!(url[1], UrlPart::Param("data2".into()));

        // no body parameter on GET, so the name is free
        let (params, _) = params_of("/uploads/{data}", false);
        assert_eq!(params, vec!["data".to_string()]);
    }

    #[test]
    fn test_path_param_clashing_with_locals() {
        let (params, _) = params_of("/x/{response}/{json}/{fetch}", false);
        assert_eq!(params, vec!["response2", "json2", "fetch2"]);

        let (params, _) = params_of("/x/{response}/{response2}", false);
        assert_eq!(params, vec!["response2", "response22"]);
    }

    #[test]
    fn test_repeated_path_param_is_one_parameter() {
        let (params, url) = params_of("/a/{id}/b/{id}", true);
        assert_eq!(params, vec!["id".to_string()]);
        assert_eq!(
            url,
            vec![
                UrlPart::Static("/a/".into()),
                UrlPart::Param("id".into()),
                UrlPart::Static("/b/".into()),
                UrlPart::Param("id".into()),
            ]
        );
    }

    #[test]
    fn test_dependencies_first_and_deduplicated() {
        let routes = RouteTable::from_json(
            r#"{ "POST": { "/posts": "Routes\\CreatePostRoute" }, "GET": { "/posts": "Routes\\ListPostsRoute" } }"#,
        )
        .unwrap();
        let ir = normalize_routes(&routes, &registry(BLOG), &ContractOptions::default());

        let names: Vec<_> = ir.shapes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Author", "CreatePostRequest", "PostResponse"]);

        let author_field = &ir.shapes[1].fields[1];
        assert_eq!(author_field.nested_shape.as_deref(), Some("Author"));
        assert!(!author_field.nullable);
        assert!(ir.shapes[2].fields[1].nullable);

        // GET /posts collides with POST /posts and is dropped
        let bindings: Vec<_> = ir.bindings.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(bindings, vec!["posts"]);
        assert_eq!(ir.skipped.len(), 1);
        assert_eq!(
            ir.skipped[0].reason,
            SkipReason::DuplicateBinding("posts".into())
        );
    }

    #[test]
    fn test_get_binding_has_no_body() {
        let routes = RouteTable::from_json(
            r#"{ "GET": { "/users/{userId}/posts": "Routes\\ListPostsRoute" },
                 "POST": { "/users/{userId}/posts": "Routes\\CreatePostRoute" } }"#,
        )
        .unwrap();
        let ir = normalize_routes(&routes, &registry(BLOG), &ContractOptions::default());

        let get = &ir.bindings[0];
        assert_eq!(get.name, "userPosts");
        assert_eq!(get.body, None);
        assert_eq!(get.path_params, vec!["userId".to_string()]);

        let post = &ir.bindings[1];
        assert_eq!(post.name, "postUserPosts");
        assert_eq!(post.body.as_deref(), Some("CreatePostRequest"));
        assert_eq!(post.response, "PostResponse");
    }

    #[test]
    fn test_unresolved_routes_are_skipped() {
        let routes = RouteTable::from_json(
            r#"{ "GET": { "/about": "Routes\\AboutRoute", "/ghost": "Routes\\Ghost" } }"#,
        )
        .unwrap();
        let ir = normalize_routes(&routes, &registry(BLOG), &ContractOptions::default());

        assert!(ir.bindings.is_empty());
        assert!(ir.shapes.is_empty());
        let reasons: Vec<_> = ir
            .skipped
            .iter()
            .map(|s| (s.path.as_str(), s.reason.clone()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                ("/about", SkipReason::Unresolved(ResolveError::NoContract)),
                ("/ghost", SkipReason::Unresolved(ResolveError::NoContract)),
            ]
        );
    }

    #[test]
    fn test_cyclic_shapes_terminate() {
        let reg = registry(
            r#"{
  "handlers": { "H": { "implements": ["C"] } },
  "contracts": { "C": { "methods": { "execute": {
    "params": [ { "name": "r", "type": "Node" } ], "returns": "Node" } } } },
  "shapes": {
    "Node": { "constructor": [ { "name": "parent", "type": "?Edge" } ] },
    "Edge": { "constructor": [ { "name": "from", "type": "Node" }, { "name": "to", "type": "Node" } ] }
  }
}"#,
        );
        let routes = RouteTable::from_json(r#"{ "GET": { "/graph": "H" } }"#).unwrap();
        let ir = normalize_routes(&routes, &reg, &ContractOptions::default());

        let names: Vec<_> = ir.shapes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Edge", "Node"]);
        assert_eq!(ir.shapes[0].fields[0].nested_shape.as_deref(), Some("Node"));
    }

    #[test]
    fn test_custom_contract_options() {
        let reg = registry(
            r#"{
  "handlers": { "H": { "implements": ["Base", "C"] } },
  "contracts": { "C": { "methods": { "handle": {
    "params": [ { "name": "r", "type": "Req" } ], "returns": "Res" } } } },
  "shapes": {}
}"#,
        );
        let routes = RouteTable::from_json(r#"{ "PUT": { "/thing": "H" } }"#).unwrap();
        let options = ContractOptions {
            marker_contract: "Base".into(),
            entry_method: "handle".into(),
        };
        let ir = normalize_routes(&routes, &reg, &options);
        assert_eq!(ir.bindings.len(), 1);
        assert_eq!(ir.bindings[0].name, "putThing");
        assert_eq!(ir.bindings[0].body.as_deref(), Some("Req"));
    }
}
