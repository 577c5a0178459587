//! Statically-typed Express + Mongoose projection.

use std::collections::BTreeSet;

use tracing::instrument;

use crudsmith_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{
        ArtifactKind, CrudOperation, Dialect, EntityDefinition, EntityNames, StartupScriptFlavor,
        capitalize,
    },
};

use super::{
    BIND_HOST, DATABASE_HOST, DEFAULT_PORT, FieldShape, HandlerSyntax, controller_handler,
    export_list, handler_args, manifest::PackageJson, model_call, route_lines, schema_lines,
    startup::startup_script, unsupported,
};

const HANDLER_SYNTAX: HandlerSyntax = HandlerSyntax {
    params: "req: Request, res: Response",
    catch_binding: "error: any",
};

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptRenderer;

impl TypeScriptRenderer {
    pub fn new() -> Self {
        Self
    }

    fn interface(&self, entity: &EntityDefinition) -> Result<String, ApplicationError> {
        let names = entity.names();
        let mut related = BTreeSet::new();
        let mut members = Vec::with_capacity(entity.fields.len());

        for field in &entity.fields {
            let line = match FieldShape::of(entity, field, ArtifactKind::Interface)? {
                FieldShape::Scalar(declared) => format!("    {}: {};", field.name, capitalize(declared)),
                FieldShape::Relation { declared, target } => {
                    if target != names.file_stem {
                        related.insert(target);
                    }
                    format!(
                        "    {}: {} | {};",
                        field.name,
                        declared.unwrap_or("string"),
                        capitalize(target)
                    )
                }
            };
            members.push(line);
        }

        let imports: String = related
            .iter()
            .map(|target| {
                format!(
                    "import {{ {} }} from './{target}.interface';\n",
                    capitalize(target)
                )
            })
            .collect();
        let spacer = if imports.is_empty() { "" } else { "\n" };

        Ok(format!(
            "{imports}{spacer}export interface {type_name} {{\n{members}\n}}\n",
            type_name = names.type_name,
            members = members.join("\n"),
        ))
    }

    fn model(&self, entity: &EntityDefinition) -> Result<String, ApplicationError> {
        let names = entity.names();
        let lines = schema_lines(entity, ArtifactKind::Model)?;

        Ok(format!(
            r#"import {{ Schema, model }} from 'mongoose';
import {{ {t} }} from '../interfaces/{f}.interface';

export const {schema} = new Schema<{t}>({{
{lines}
}});

export default model<{t}>('{f}', {schema});
"#,
            t = names.type_name,
            f = names.file_stem,
            schema = names.schema_var(),
            lines = lines.join("\n"),
        ))
    }

    fn service(&self, names: &EntityNames) -> String {
        let t = &names.type_name;
        let model = names.model_var();
        let functions = CrudOperation::ALL
            .iter()
            .map(|op| {
                let (params, returns) = match op {
                    CrudOperation::Create => (format!("data: {t}"), t.to_string()),
                    CrudOperation::Get | CrudOperation::Delete => {
                        ("id: string".to_string(), format!("{t} | null"))
                    }
                    CrudOperation::List => (String::new(), format!("{t}[]")),
                    CrudOperation::Update => (
                        format!("id: string, data: Partial<{t}>"),
                        format!("{t} | null"),
                    ),
                };
                let call = model_call(&model, *op, "id", "data");
                format!(
                    "const {} = async ({params}): Promise<{returns}> => {{\n    return {call};\n}};\n",
                    op.function_name(t)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "import {{ {t} }} from '../interfaces/{f}.interface';\nimport {model} from '../models/{f}.model';\n\n{functions}\nexport default {{\n{exports}\n}};\n",
            f = names.file_stem,
            exports = export_list(names),
        )
    }

    fn controller(&self, names: &EntityNames) -> String {
        let service = names.service_var();
        let handlers = CrudOperation::ALL
            .iter()
            .map(|op| {
                let call = format!("{service}.{}({})", op.function_name(&names.type_name), handler_args(*op));
                controller_handler(names, *op, &call, &HANDLER_SYNTAX)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "import {{ Request, Response }} from 'express';\nimport {service} from '../services/{f}.service';\n\n{handlers}\nexport default {{\n{exports}\n}};\n",
            f = names.file_stem,
            exports = export_list(names),
        )
    }

    fn routes(&self, names: &EntityNames) -> String {
        format!(
            "import {{ Router }} from 'express';\nimport {controller} from '../controllers/{f}.controller';\n\nconst router = Router();\n\n{routes}\n\nexport default router;\n",
            controller = names.controller_var(),
            f = names.file_stem,
            routes = route_lines(names),
        )
    }
}

impl TemplateRenderer for TypeScriptRenderer {
    fn dialect(&self) -> Dialect {
        Dialect::TypeScript
    }

    #[instrument(skip_all, fields(entity = %entity.name, %kind))]
    fn render_entity(
        &self,
        kind: ArtifactKind,
        entity: &EntityDefinition,
    ) -> Result<String, ApplicationError> {
        let names = entity.names();
        match kind {
            ArtifactKind::Interface => self.interface(entity),
            ArtifactKind::Model => self.model(entity),
            ArtifactKind::Service => Ok(self.service(&names)),
            ArtifactKind::Controller => Ok(self.controller(&names)),
            ArtifactKind::Routes => Ok(self.routes(&names)),
            _ => Err(unsupported(entity, kind, self.dialect())),
        }
    }

    fn render_entry_point(&self, entities: &[EntityNames], project_name: &str) -> String {
        let imports: String = entities
            .iter()
            .map(|n| format!("import {} from './routes/{}.routes';\n", n.routes_var(), n.file_stem))
            .collect();
        let mounts: String = entities
            .iter()
            .map(|n| format!("app.use('/{}', {});\n", n.route_segment, n.routes_var()))
            .collect();

        format!(
            r#"import express from 'express';
import cors from 'cors';
import mongoose from 'mongoose';
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
            .with_main("src/index.ts")
            .with_script("start", "ts-node src/index.ts")
            .with_script("dev", "nodemon --exec ts-node src/index.ts")
            .with_dev_dependencies([
                ("typescript", "^5.6.2"),
                ("ts-node", "^10.9.2"),
                ("nodemon", "^3.1.7"),
                ("@types/express", "^4.17.21"),
                ("@types/cors", "^2.8.17"),
                ("@types/node", "^22.7.4"),
            ])
            .render()
    }

    fn render_startup_script(&self, project_name: &str, flavor: StartupScriptFlavor) -> String {
        startup_script(project_name, flavor, Some("npx tsc --init"))
    }
}

#[cfg(test)]
mod tests {
    use crudsmith_core::domain::FieldDefinition;

    use super::*;

    fn product() -> EntityDefinition {
        EntityDefinition::new("Product")
            .with_field(FieldDefinition::new("title", "string"))
            .with_field(FieldDefinition::new("price", "number"))
    }

    fn render(kind: ArtifactKind, entity: &EntityDefinition) -> String {
        TypeScriptRenderer::new().render_entity(kind, entity).unwrap()
    }

    #[test]
    fn interface_capitalizes_declared_types() {
        let out = render(ArtifactKind::Interface, &product());
        assert!(out.contains("export interface Product {"));
        assert!(out.contains("    title: String;"));
        assert!(out.contains("    price: Number;"));
    }

    #[test]
    fn interface_projects_refs_as_union_with_import() {
        let entity = EntityDefinition::new("Product")
            .with_field(FieldDefinition::new("category", "string").with_ref("Category"));
        let out = render(ArtifactKind::Interface, &entity);
        assert!(out.contains("category: string | Category;"));
        assert!(out.starts_with("import { Category } from './Category.interface';"));
    }

    #[test]
    fn ref_without_type_projects_as_id_union() {
        let entity = EntityDefinition::new("Order").with_field(FieldDefinition {
            name: "customer".into(),
            field_type: None,
            reference: Some("Customer".into()),
        });
        let out = render(ArtifactKind::Interface, &entity);
        assert!(out.contains("customer: string | Customer;"));
    }

    #[test]
    fn self_reference_needs_no_import() {
        let entity = EntityDefinition::new("Category")
            .with_field(FieldDefinition::new("parent", "string").with_ref("Category"));
        let out = render(ArtifactKind::Interface, &entity);
        assert!(!out.contains("import"));
    }

    #[test]
    fn model_binds_schema_to_interface() {
        let out = render(ArtifactKind::Model, &product());
        assert!(out.contains("import { Product } from '../interfaces/Product.interface';"));
        assert!(out.contains("export const productSchema = new Schema<Product>({"));
        assert!(out.contains("    title: { type: String },"));
        assert!(out.contains("export default model<Product>('Product', productSchema);"));
    }

    #[test]
    fn service_exports_exactly_five_operations() {
        let out = render(ArtifactKind::Service, &product());
        assert!(out.contains("import ProductModel from '../models/Product.model';"));
        assert!(out.contains("return ProductModel.findByIdAndUpdate(id, data, { new: true });"));
        assert!(out.contains(
            "export default {\n    createProduct,\n    getProduct,\n    getProducts,\n    updateProduct,\n    deleteProduct,\n};"
        ));
    }

    #[test]
    fn controller_calls_service_by_crud_names() {
        let out = render(ArtifactKind::Controller, &product());
        assert!(out.contains("import productService from '../services/Product.service';"));
        assert!(out.contains("await productService.createProduct(req.body);"));
        assert!(out.contains("await productService.getProducts();"));
        assert!(out.contains("res.status(201).json(result);"));
        assert!(out.contains("catch (error: any)"));
    }

    #[test]
    fn routes_follow_verb_table() {
        let out = render(ArtifactKind::Routes, &product());
        let expected = "router.post('/', productController.createProduct);\n\
                        router.get('/:id', productController.getProduct);\n\
                        router.get('/', productController.getProducts);\n\
                        router.put('/:id', productController.updateProduct);\n\
                        router.delete('/:id', productController.deleteProduct);";
        assert!(out.contains(expected), "{out}");
    }

    #[test]
    fn entry_point_mounts_lowercased_segments_and_binds_defaults() {
        let names = [EntityNames::new("Product"), EntityNames::new("OrderItem")];
        let out = TypeScriptRenderer::new().render_entry_point(&names, "shop");
        assert!(out.contains("import productRoutes from './routes/Product.routes';"));
        assert!(out.contains("app.use('/orderitem', orderItemRoutes);"));
        assert!(out.contains("mongodb://127.0.0.1:27017/shop"));
        assert!(out.contains("Number(process.env.PORT) || 3000"));
        assert!(out.contains("app.listen(PORT, '0.0.0.0'"));
        assert!(out.contains("${PORT}"));
    }

    #[test]
    fn manifest_lists_runtime_and_dev_dependencies() {
        let out = TypeScriptRenderer::new().render_manifest("shop");
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["name"], "shop");
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["scripts"]["dev"], "nodemon --exec ts-node src/index.ts");
        for dep in ["express", "mongoose", "cors"] {
            assert!(json["dependencies"][dep].is_string(), "{dep}");
        }
        for dep in ["typescript", "ts-node", "nodemon", "@types/express", "@types/cors", "@types/node"] {
            assert!(json["devDependencies"][dep].is_string(), "{dep}");
        }
    }

    #[test]
    fn interface_and_service_are_not_skipped_for_empty_field_list() {
        let entity = EntityDefinition::new("Tag");
        let out = render(ArtifactKind::Interface, &entity);
        assert_eq!(out, "export interface Tag {\n\n}\n");
    }
}
