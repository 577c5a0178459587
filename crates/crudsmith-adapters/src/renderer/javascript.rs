//! CommonJS Express + Mongoose projection.
//!
//! There is no interface or service layer here; controllers talk to the
//! model directly.

use tracing::instrument;

use crudsmith_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{ArtifactKind, CrudOperation, Dialect, EntityDefinition, EntityNames, StartupScriptFlavor},
};

use super::{
    BIND_HOST, DATABASE_HOST, DEFAULT_PORT, HandlerSyntax, controller_handler, export_list,
    manifest::PackageJson, model_call, route_lines, schema_lines, startup::startup_script,
    unsupported,
};

const HANDLER_SYNTAX: HandlerSyntax = HandlerSyntax {
    params: "req, res",
    catch_binding: "error",
};

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptRenderer;

impl JavaScriptRenderer {
    pub fn new() -> Self {
        Self
    }

    fn model(&self, entity: &EntityDefinition) -> Result<String, ApplicationError> {
        let names = entity.names();
        let lines = schema_lines(entity, ArtifactKind::Model)?;

        Ok(format!(
            r#"const mongoose = require('mongoose');
const {{ Schema }} = mongoose;

const {schema} = new Schema({{
{lines}
}}, {{ timestamps: true }});

module.exports = mongoose.model('{f}', {schema});
"#,
            schema = names.schema_var(),
            f = names.file_stem,
            lines = lines.join("\n"),
        ))
    }

    fn controller(&self, names: &EntityNames) -> String {
        let model = names.model_var();
        let handlers = CrudOperation::ALL
            .iter()
            .map(|op| {
                let call = model_call(&model, *op, "req.params.id", "req.body");
                controller_handler(names, *op, &call, &HANDLER_SYNTAX)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "const {model} = require('../models/{f}.model');\n\n{handlers}\nmodule.exports = {{\n{exports}\n}};\n",
            f = names.file_stem,
            exports = export_list(names),
        )
    }

    fn routes(&self, names: &EntityNames) -> String {
        format!(
            "const express = require('express');\nconst {controller} = require('../controllers/{f}.controller');\n\nconst router = express.Router();\n\n{routes}\n\nmodule.exports = router;\n",
            controller = names.controller_var(),
            f = names.file_stem,
            routes = route_lines(names),
        )
    }
}

impl TemplateRenderer for JavaScriptRenderer {
    fn dialect(&self) -> Dialect {
        Dialect::JavaScript
    }

    #[instrument(skip_all, fields(entity = %entity.name, %kind))]
    fn render_entity(
        &self,
        kind: ArtifactKind,
        entity: &EntityDefinition,
    ) -> Result<String, ApplicationError> {
        match kind {
            ArtifactKind::Model => self.model(entity),
            ArtifactKind::Controller => Ok(self.controller(&entity.names())),
            ArtifactKind::Routes => Ok(self.routes(&entity.names())),
            _ => Err(unsupported(entity, kind, self.dialect())),
        }
    }

    fn render_entry_point(&self, entities: &[EntityNames], project_name: &str) -> String {
        let imports: String = entities
            .iter()
            .map(|n| {
                format!(
                    "const {} = require('./routes/{}.routes');\n",
                    n.routes_var(),
                    n.file_stem
                )
            })
            .collect();
        let mounts: String = entities
            .iter()
            .map(|n| format!("app.use('/{}', {});\n", n.route_segment, n.routes_var()))
            .collect();

        format!(
            r#"const express = require('express');
const cors = require('cors');
const mongoose = require('mongoose');
{imports}
const app = express();

app.use(cors());
app.use(express.json());

{mounts}
mongoose.set('strictQuery', true);
mongoose
    .connect('{DATABASE_HOST}/{project_name}')
    .then(() => console.log('MongoDB connected'))
    .catch((err) => console.error(err));

const PORT = Number(process.env.PORT) || {DEFAULT_PORT};
app.listen(PORT, '{BIND_HOST}', () => {{
    console.log(`Server running on port ${{PORT}}`);
}});
"#
        )
    }

    fn render_manifest(&self, project_name: &str) -> String {
        PackageJson::new(project_name)
            .with_script("start", "node src/index.js")
            .with_script("dev", "nodemon src/index.js")
            .with_dev_dependencies([("nodemon", "^3.1.7")])
            .render()
    }

    fn render_startup_script(&self, project_name: &str, flavor: StartupScriptFlavor) -> String {
        startup_script(project_name, flavor, None)
    }
}

#[cfg(test)]
mod tests {
    use crudsmith_core::domain::FieldDefinition;

    use super::*;

    fn product() -> EntityDefinition {
        EntityDefinition::new("Product")
            .with_field(FieldDefinition::new("title", "string"))
            .with_field(FieldDefinition::new("category", "string").with_ref("Category"))
    }

    #[test]
    fn model_exports_mongoose_model_with_timestamps() {
        let out = JavaScriptRenderer::new()
            .render_entity(ArtifactKind::Model, &product())
            .unwrap();
        assert!(out.contains("const productSchema = new Schema({"));
        assert!(out.contains("    category: { type: Schema.Types.ObjectId, ref: 'Category' },"));
        assert!(out.contains("}, { timestamps: true });"));
        assert!(out.contains("module.exports = mongoose.model('Product', productSchema);"));
    }

    #[test]
    fn controller_uses_model_directly() {
        let out = JavaScriptRenderer::new()
            .render_entity(ArtifactKind::Controller, &product())
            .unwrap();
        assert!(out.starts_with("const ProductModel = require('../models/Product.model');"));
        assert!(out.contains("await ProductModel.findByIdAndDelete(req.params.id);"));
        assert!(out.contains("const getProducts = async (req, res) => {"));
        assert!(out.contains("module.exports = {\n    createProduct,"));
    }

    #[test]
    fn routes_use_express_router() {
        let out = JavaScriptRenderer::new()
            .render_entity(ArtifactKind::Routes, &product())
            .unwrap();
        assert!(out.contains("const router = express.Router();"));
        assert!(out.contains("router.put('/:id', productController.updateProduct);"));
        assert!(out.ends_with("module.exports = router;\n"));
    }

    #[test]
    fn typed_layers_are_not_rendered() {
        let renderer = JavaScriptRenderer::new();
        for kind in [ArtifactKind::Interface, ArtifactKind::Service] {
            let err = renderer.render_entity(kind, &product()).unwrap_err();
            assert!(matches!(err, ApplicationError::RenderingFailed { .. }));
        }
    }

    #[test]
    fn entry_point_requires_each_router() {
        let names = [EntityNames::new("Product")];
        let out = JavaScriptRenderer::new().render_entry_point(&names, "shop");
        assert!(out.contains("const productRoutes = require('./routes/Product.routes');"));
        assert!(out.contains("app.use('/product', productRoutes);"));
        assert!(out.contains(".connect('mongodb://127.0.0.1:27017/shop')"));
    }

    #[test]
    fn manifest_and_startup_skip_compiler_setup() {
        let renderer = JavaScriptRenderer::new();
        let json: serde_json::Value =
            serde_json::from_str(&renderer.render_manifest("shop")).unwrap();
        assert_eq!(json["scripts"]["start"], "node src/index.js");
        assert!(json["devDependencies"].get("typescript").is_none());

        let script = renderer.render_startup_script("shop", StartupScriptFlavor::Shell);
        assert!(!script.contains("tsc"));
    }
}
