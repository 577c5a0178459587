//! Template Engine - turns a request into an immutable artifact set.
//!
//! The engine owns ordering and paths; the dialect renderer owns the text.
//! Nothing here touches the filesystem.

use tracing::{debug, instrument, warn};

use crate::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{
        Artifact, ArtifactKind, ArtifactSlot, Dialect, EntityDefinition, EntityNames,
        GenerationRequest, Permissions, ProjectArtifactSet, StartupScriptFlavor, artifact_path,
    },
};

pub struct TemplateEngine {
    renderer: Box<dyn TemplateRenderer>,
    startup: StartupScriptFlavor,
}

impl TemplateEngine {
    pub fn new(renderer: Box<dyn TemplateRenderer>) -> Self {
        Self {
            renderer,
            startup: StartupScriptFlavor::default(),
        }
    }

    pub fn with_startup_script(mut self, flavor: StartupScriptFlavor) -> Self {
        self.startup = flavor;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.renderer.dialect()
    }

    pub fn startup_script(&self) -> StartupScriptFlavor {
        self.startup
    }

    /// Render every artifact of the dialect for `request`.
    ///
    /// One slot per (entity, per-entity kind) plus one per project-level kind,
    /// grouped by kind in dependency order. An entity is all-or-nothing: if
    /// any of its kinds fails, every slot of that entity becomes `Skipped` and
    /// the entry point does not mount it. The rest of the batch still renders.
    #[instrument(
        skip_all,
        fields(project = %request.project_name(), dialect = %self.dialect())
    )]
    pub fn render_project(&self, request: &GenerationRequest) -> ProjectArtifactSet {
        let dialect = self.dialect();
        let entity_kinds: Vec<ArtifactKind> = dialect
            .artifact_kinds()
            .iter()
            .copied()
            .filter(ArtifactKind::is_per_entity)
            .collect();

        let rendered: Vec<_> = request
            .entities()
            .iter()
            .map(|entity| {
                self.note_unknown_types(entity);
                (entity, self.render_entity(&entity_kinds, entity))
            })
            .collect();

        let mounted: Vec<EntityNames> = rendered
            .iter()
            .filter(|(_, result)| result.is_ok())
            .map(|(entity, _)| entity.names())
            .collect();

        let mut slots = Vec::with_capacity(dialect.expected_file_count(rendered.len()));
        for &kind in dialect.artifact_kinds() {
            if !kind.is_per_entity() {
                slots.push(ArtifactSlot::Rendered(
                    self.render_project_level(kind, request.project_name(), &mounted),
                ));
                continue;
            }
            for (entity, result) in &rendered {
                slots.push(match result {
                    Ok(contents) => {
                        let content = contents
                            .iter()
                            .find(|(k, _)| *k == kind)
                            .map(|(_, c)| c.clone())
                            .unwrap_or_default();
                        ArtifactSlot::Rendered(Artifact {
                            kind,
                            entity: Some(entity.name.clone()),
                            path: artifact_path(kind, Some(&entity.names()), dialect, self.startup),
                            content,
                            permissions: Permissions::default(),
                        })
                    }
                    Err(e) => ArtifactSlot::Skipped {
                        entity: entity.name.clone(),
                        kind,
                        reason: e.to_string(),
                    },
                });
            }
        }

        let set = ProjectArtifactSet::new(request.project_name(), dialect, slots);
        debug!(
            files = set.file_count(),
            skipped = set.skipped().count(),
            bytes = set.total_bytes(),
            "Artifact set rendered"
        );
        set
    }

    fn render_entity(
        &self,
        kinds: &[ArtifactKind],
        entity: &EntityDefinition,
    ) -> Result<Vec<(ArtifactKind, String)>, ApplicationError> {
        let rendered = kinds
            .iter()
            .map(|&kind| Ok((kind, self.renderer.render_entity(kind, entity)?)))
            .collect::<Result<Vec<_>, ApplicationError>>();

        if let Err(e) = &rendered {
            warn!(entity = %entity.name, error = %e, "Skipping entity");
        }
        rendered
    }

    fn render_project_level(
        &self,
        kind: ArtifactKind,
        project: &str,
        mounted: &[EntityNames],
    ) -> Artifact {
        let (content, permissions) = match kind {
            ArtifactKind::Manifest => (self.renderer.render_manifest(project), Permissions::default()),
            ArtifactKind::StartupScript => (
                self.renderer.render_startup_script(project, self.startup),
                Permissions::full(),
            ),
            _ => (
                self.renderer.render_entry_point(mounted, project),
                Permissions::default(),
            ),
        };

        Artifact {
            kind,
            entity: None,
            path: artifact_path(kind, None, self.dialect(), self.startup),
            content,
            permissions,
        }
    }

    fn note_unknown_types(&self, entity: &EntityDefinition) {
        for field in &entity.fields {
            if let Some(declared) = field.declared_type()
                && field.primitive().is_none()
            {
                debug!(
                    entity = %entity.name,
                    field = %field.name,
                    r#type = declared,
                    "Unrecognized field type, passing through verbatim"
                );
            }
        }
    }
}
