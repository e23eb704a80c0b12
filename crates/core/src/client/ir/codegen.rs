//! Code generation from API IR to TypeScript AST.
//!
//! This module transforms normalized shapes and bindings into TypeScript AST
//! nodes (interfaces, client methods, statements, expressions).
//!
//! The generated AST can then be emitted to strings via the `Emit` trait.

use super::api::{ApiIR, BODY_PARAM, BindingIR, FieldIR, ShapeIR, UrlPart};
use super::types::{
    TemplatePart, TsClient, TsExpr, TsInterface, TsMethod, TsModule, TsParam, TsPrimitive, TsProp,
    TsStmt, TsType,
};
use super::utils::map_primitive;

/// Name of the exported client object.
pub const CLIENT_NAME: &str = "api";

fn module_header() -> Vec<String> {
    vec![
        "Auto-generated TypeScript API Client".into(),
        "Generated from the route table and contract registry".into(),
        String::new(),
        "DO NOT EDIT MANUALLY - Regenerate using: routegen client".into(),
    ]
}

/// Generate a complete TypeScript module from API IR.
pub fn codegen_module(api: &ApiIR) -> TsModule {
    TsModule {
        header: module_header(),
        types: api.shapes.iter().map(codegen_interface).collect(),
        client: TsClient {
            name: CLIENT_NAME.into(),
            methods: api.bindings.iter().map(codegen_binding).collect(),
            default_export: true,
        },
    }
}

/// Generate an interface declaration for a shape.
fn codegen_interface(shape: &ShapeIR) -> TsInterface {
    TsInterface {
        name: shape.name.clone(),
        properties: shape.fields.iter().map(codegen_field).collect(),
    }
}

fn codegen_field(field: &FieldIR) -> TsProp {
    let base = match &field.nested_shape {
        Some(short) => TsType::Ref(short.clone()),
        None => map_primitive(&field.declared_type),
    };
    TsProp {
        name: field.name.clone(),
        ty: if field.nullable { base.nullable() } else { base },
        optional: field.optional,
    }
}

/// Generate the client method for a binding.
fn codegen_binding(binding: &BindingIR) -> TsMethod {
    let mut params = Vec::new();
    if let Some(request) = &binding.body {
        params.push(TsParam {
            name: BODY_PARAM.into(),
            ty: TsType::Ref(request.clone()),
        });
    }
    params.extend(binding.path_params.iter().map(|name| TsParam {
        name: name.clone(),
        ty: TsType::Primitive(TsPrimitive::String),
    }));

    TsMethod {
        name: binding.name.clone(),
        params,
        return_type: TsType::Generic {
            name: "Promise".into(),
            args: vec![TsType::Ref(binding.response.clone())],
        },
        body: codegen_fetch_body(binding),
        is_async: true,
    }
}

/// Generate the fetch-and-unwrap statements of a binding.
fn codegen_fetch_body(binding: &BindingIR) -> Vec<TsStmt> {
    let response = || TsExpr::ident("response");

    let mut init = vec![
        ("method".to_string(), TsExpr::string(binding.method.as_str())),
        (
            "headers".to_string(),
            TsExpr::Object(vec![(
                "Content-Type".to_string(),
                TsExpr::string("application/json"),
            )]),
        ),
    ];
    if binding.body.is_some() {
        init.push((
            "body".to_string(),
            TsExpr::call(
                TsExpr::member(TsExpr::ident("JSON"), "stringify"),
                vec![TsExpr::ident(BODY_PARAM)],
            ),
        ));
    }

    let fetch = TsExpr::call(
        TsExpr::ident("fetch"),
        vec![codegen_url(&binding.url), TsExpr::Object(init)],
    );

    let status_error = TsExpr::New {
        callee: Box::new(TsExpr::ident("Error")),
        args: vec![TsExpr::Template(vec![
            TemplatePart::Static("HTTP error! status: ".into()),
            TemplatePart::Dynamic(TsExpr::member(response(), "status")),
        ])],
    };

    vec![
        TsStmt::Const {
            name: "response".into(),
            init: TsExpr::Await(Box::new(fetch)),
        },
        TsStmt::If {
            cond: TsExpr::Not(Box::new(TsExpr::member(response(), "ok"))),
            then_body: vec![TsStmt::Throw(status_error)],
        },
        TsStmt::Const {
            name: "json".into(),
            init: TsExpr::Await(Box::new(TsExpr::call(
                TsExpr::member(response(), "json"),
                vec![],
            ))),
        },
        TsStmt::Return(TsExpr::member(TsExpr::ident("json"), "data")),
    ]
}

/// A string literal when the path has no parameters, a template literal otherwise.
fn codegen_url(url: &[UrlPart]) -> TsExpr {
    let has_params = url.iter().any(|part| matches!(part, UrlPart::Param(_)));
    if !has_params {
        let path: String = url
            .iter()
            .filter_map(|part| match part {
                UrlPart::Static(s) => Some(s.as_str()),
                UrlPart::Param(_) => None,
            })
            .collect();
        return TsExpr::string(&path);
    }

    TsExpr::Template(
        url.iter()
            .map(|part| match part {
                UrlPart::Static(s) => TemplatePart::Static(s.clone()),
                UrlPart::Param(name) => TemplatePart::Dynamic(TsExpr::ident(name)),
            })
            .collect(),
    )
}
