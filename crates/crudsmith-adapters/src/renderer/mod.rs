//! Dialect renderers.
//!
//! Each renderer turns one entity definition into source text for one
//! artifact kind. Names come from [`EntityNames`] and the CRUD table from
//! [`CrudOperation`]; renderers never derive identifiers on their own.

mod javascript;
mod manifest;
mod startup;
mod typescript;

pub use javascript::JavaScriptRenderer;
pub use manifest::{Dependency, PackageJson};
pub use startup::startup_script;
pub use typescript::TypeScriptRenderer;

use crudsmith_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{
        ArtifactKind, CrudOperation, Dialect, EntityDefinition, EntityNames, FieldDefinition,
        capitalize,
    },
};

/// Renderer for `dialect`.
pub fn renderer_for(dialect: Dialect) -> Box<dyn TemplateRenderer> {
    match dialect {
        Dialect::TypeScript => Box::new(TypeScriptRenderer::new()),
        Dialect::JavaScript => Box::new(JavaScriptRenderer::new()),
    }
}

pub(crate) const DATABASE_HOST: &str = "mongodb://127.0.0.1:27017";
pub(crate) const DEFAULT_PORT: u16 = 3000;
pub(crate) const BIND_HOST: &str = "0.0.0.0";

// ── Field projection ─────────────────────────────────────────────────────────

/// How one field shows up in generated sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldShape<'a> {
    /// Plain typed field; the declared type verbatim.
    Scalar(&'a str),
    /// Foreign key to `target`, with its declared id type if any.
    Relation {
        declared: Option<&'a str>,
        target: &'a str,
    },
}

impl<'a> FieldShape<'a> {
    pub(crate) fn of(
        entity: &EntityDefinition,
        field: &'a FieldDefinition,
        kind: ArtifactKind,
    ) -> Result<Self, ApplicationError> {
        match (field.reference(), field.declared_type()) {
            (Some(target), declared) => Ok(Self::Relation { declared, target }),
            (None, Some(declared)) => Ok(Self::Scalar(declared)),
            (None, None) => Err(ApplicationError::RenderingFailed {
                entity: entity.name.clone(),
                kind,
                reason: format!("field '{}' has neither a type nor a ref", field.name),
            }),
        }
    }

    /// Persistence schema line: `name: { type: ... }`.
    pub(crate) fn schema_line(&self, name: &str) -> String {
        match self {
            Self::Scalar(declared) => format!("    {name}: {{ type: {} }},", capitalize(declared)),
            Self::Relation { target, .. } => {
                format!("    {name}: {{ type: Schema.Types.ObjectId, ref: '{target}' }},")
            }
        }
    }
}

/// Schema lines for every field, or the first projection error.
pub(crate) fn schema_lines(
    entity: &EntityDefinition,
    kind: ArtifactKind,
) -> Result<Vec<String>, ApplicationError> {
    entity
        .fields
        .iter()
        .map(|field| Ok(FieldShape::of(entity, field, kind)?.schema_line(&field.name)))
        .collect()
}

pub(crate) fn unsupported(entity: &EntityDefinition, kind: ArtifactKind, dialect: Dialect) -> ApplicationError {
    ApplicationError::RenderingFailed {
        entity: entity.name.clone(),
        kind,
        reason: format!("{dialect} projects do not contain {kind} files"),
    }
}

// ── CRUD handlers ────────────────────────────────────────────────────────────

/// Arguments a handler passes on for `op`.
pub(crate) fn handler_args(op: CrudOperation) -> &'static str {
    match (op.takes_id(), op.takes_body()) {
        (true, true) => "req.params.id, req.body",
        (true, false) => "req.params.id",
        (false, true) => "req.body",
        (false, false) => "",
    }
}

/// Mongoose call for `op` on `model`, given id and body expressions.
pub(crate) fn model_call(model: &str, op: CrudOperation, id: &str, body: &str) -> String {
    match op {
        CrudOperation::Create => format!("{model}.create({body})"),
        CrudOperation::Get => format!("{model}.findById({id})"),
        CrudOperation::List => format!("{model}.find()"),
        CrudOperation::Update => format!("{model}.findByIdAndUpdate({id}, {body}, {{ new: true }})"),
        CrudOperation::Delete => format!("{model}.findByIdAndDelete({id})"),
    }
}

/// Status sent on success.
pub(crate) fn success_status(op: CrudOperation) -> u16 {
    match op {
        CrudOperation::Create => 201,
        _ => 200,
    }
}

/// Status sent when the data layer throws.
pub(crate) fn failure_status(op: CrudOperation) -> u16 {
    if op.takes_body() { 400 } else { 500 }
}

/// Syntax differences between dialects for controller handlers.
pub(crate) struct HandlerSyntax {
    pub params: &'static str,
    pub catch_binding: &'static str,
}

/// Express handler for `op`; `call` is the awaited data-layer expression.
pub(crate) fn controller_handler(
    names: &EntityNames,
    op: CrudOperation,
    call: &str,
    syntax: &HandlerSyntax,
) -> String {
    let not_found = if op.takes_id() {
        format!(
            "        if (!result) {{\n            return res.status(404).json({{ message: '{} not found' }});\n        }}\n",
            names.type_name
        )
    } else {
        String::new()
    };

    format!(
        "const {fn_name} = async ({params}) => {{\n    try {{\n        const result = await {call};\n{not_found}        res.status({ok}).json(result);\n    }} catch ({catch_binding}) {{\n        res.status({err}).json({{ message: error.message }});\n    }}\n}};\n",
        fn_name = op.function_name(&names.type_name),
        params = syntax.params,
        ok = success_status(op),
        err = failure_status(op),
        catch_binding = syntax.catch_binding,
    )
}

/// `router.<verb>('<path>', <controller>.<fn>);` for every operation.
pub(crate) fn route_lines(names: &EntityNames) -> String {
    CrudOperation::ALL
        .iter()
        .map(|op| {
            format!(
                "router.{}('{}', {}.{});",
                op.verb().router_method(),
                op.path(),
                names.controller_var(),
                op.function_name(&names.type_name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Function names in CRUD order, one per line, for export objects.
pub(crate) fn export_list(names: &EntityNames) -> String {
    CrudOperation::ALL
        .iter()
        .map(|op| format!("    {},", op.function_name(&names.type_name)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_without_type_or_ref_cannot_be_projected() {
        let entity = EntityDefinition::new("Product").with_field(FieldDefinition {
            name: "mystery".into(),
            field_type: None,
            reference: None,
        });
        let err = schema_lines(&entity, ArtifactKind::Model).unwrap_err();
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn schema_lines_capitalize_types_and_bind_refs() {
        let entity = EntityDefinition::new("Product")
            .with_field(FieldDefinition::new("title", "string"))
            .with_field(FieldDefinition::new("category", "string").with_ref("Category"));
        let lines = schema_lines(&entity, ArtifactKind::Model).unwrap();
        assert_eq!(lines[0], "    title: { type: String },");
        assert_eq!(
            lines[1],
            "    category: { type: Schema.Types.ObjectId, ref: 'Category' },"
        );
    }

    #[test]
    fn blank_field_name_is_emitted_verbatim() {
        let entity = EntityDefinition::new("Product").with_field(FieldDefinition::new("", "string"));
        let lines = schema_lines(&entity, ArtifactKind::Model).unwrap();
        assert_eq!(lines, ["    : { type: String },"]);
    }

    #[test]
    fn handler_arguments_follow_crud_table() {
        assert_eq!(handler_args(CrudOperation::Create), "req.body");
        assert_eq!(handler_args(CrudOperation::List), "");
        assert_eq!(handler_args(CrudOperation::Update), "req.params.id, req.body");
        assert_eq!(success_status(CrudOperation::Create), 201);
        assert_eq!(failure_status(CrudOperation::Delete), 500);
    }

    #[test]
    fn model_calls_map_to_mongoose_methods() {
        assert_eq!(model_call("M", CrudOperation::List, "id", "b"), "M.find()");
        assert_eq!(
            model_call("M", CrudOperation::Update, "id", "b"),
            "M.findByIdAndUpdate(id, b, { new: true })"
        );
    }

    #[test]
    fn by_id_handlers_answer_404() {
        let names = EntityNames::new("Product");
        let syntax = HandlerSyntax {
            params: "req, res",
            catch_binding: "error",
        };
        let get = controller_handler(&names, CrudOperation::Get, "x", &syntax);
        assert!(get.contains("res.status(404)"));
        let list = controller_handler(&names, CrudOperation::List, "x", &syntax);
        assert!(!list.contains("404"));
    }

    #[test]
    fn renderer_for_matches_dialect() {
        for dialect in Dialect::ALL {
            assert_eq!(renderer_for(dialect).dialect(), dialect);
        }
    }
}
