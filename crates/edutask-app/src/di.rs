//! Dependency injection module using Shaku.
//!
//! `EdutaskModule` wires the user DAO into the user controller. The DAO's
//! collection handle is opened before the module is built and handed in as
//! a component parameter.

use edutask_core::{module, EdutaskResult, HasComponent};
use edutask_repository::{
    Dao, DaoImpl, DaoImplParameters, DocumentDatabase, DocumentStore, ValidatorProvider,
};
use edutask_service::{UserController, UserControllerComponent};
use std::sync::Arc;

/// Collection holding user records.
pub const USER_COLLECTION: &str = "user";

// User module: the `user` collection DAO and the controller on top of it.
module! {
    pub EdutaskModule {
        components = [
            DaoImpl,
            UserControllerComponent,
        ],
        providers = [],
    }
}

/// Builds the module around an opened user collection.
#[must_use]
pub fn build_module_for_store(store: Arc<dyn DocumentStore>) -> EdutaskModule {
    EdutaskModule::builder()
        .with_component_parameters::<DaoImpl>(DaoImplParameters { store })
        .build()
}

/// Opens the user collection (creating it with its validator if needed) and
/// builds the module.
pub async fn build_edutask_module(
    database: &dyn DocumentDatabase,
    validators: &dyn ValidatorProvider,
) -> EdutaskResult<Arc<EdutaskModule>> {
    let dao = DaoImpl::open(database, validators, USER_COLLECTION).await?;
    Ok(Arc::new(build_module_for_store(dao.store())))
}

/// Trait for resolving controllers from a module.
pub trait ControllerResolver {
    /// Resolves the user controller.
    fn user_controller(&self) -> Arc<dyn UserController>;

    /// Resolves the user DAO.
    fn user_dao(&self) -> Arc<dyn Dao>;
}

impl ControllerResolver for EdutaskModule {
    fn user_controller(&self) -> Arc<dyn UserController> {
        HasComponent::<dyn UserController>::resolve(self)
    }

    fn user_dao(&self) -> Arc<dyn Dao> {
        HasComponent::<dyn Dao>::resolve(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use edutask_core::EdutaskError;
    use edutask_repository::{
        BsonType, InMemoryDatabase, JsonSchema, SchemaDescriptor, StaticValidatorProvider,
    };

    fn user_validators() -> StaticValidatorProvider {
        StaticValidatorProvider::new().with_schema(
            USER_COLLECTION,
            SchemaDescriptor::new(
                JsonSchema::object()
                    .required_property("firstName", JsonSchema::of_type(BsonType::String))
                    .required_property("lastName", JsonSchema::of_type(BsonType::String))
                    .required_property("email", JsonSchema::of_type(BsonType::String)),
            ),
        )
    }

    #[test]
    fn test_has_component_trait_bounds() {
        fn _assert_has_user_controller<T: HasComponent<dyn UserController>>() {}
        fn _assert_has_dao<T: HasComponent<dyn Dao>>() {}
        fn _assert_resolver<T: ControllerResolver>() {}

        _assert_has_user_controller::<EdutaskModule>();
        _assert_has_dao::<EdutaskModule>();
        _assert_resolver::<EdutaskModule>();
    }

    #[tokio::test]
    async fn test_module_wires_controller_to_dao() {
        let db = InMemoryDatabase::new();
        let module = build_edutask_module(&db, &user_validators()).await.unwrap();

        assert_eq!(module.user_dao().collection_name(), USER_COLLECTION);

        let controller = module.user_controller();
        controller
            .create(doc! { "firstName": "Jane", "lastName": "Doe", "email": "jane.doe@example.com" })
            .await
            .unwrap();

        let found = controller
            .get_user_by_email(Some("jane.doe@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_str("firstName").unwrap(), "Jane");
        assert_eq!(db.list_collection_names().await.unwrap(), vec![USER_COLLECTION]);
    }

    #[tokio::test]
    async fn test_module_requires_user_validator() {
        let db = InMemoryDatabase::new();
        let Err(err) = build_edutask_module(&db, &StaticValidatorProvider::new()).await else {
            panic!("module built without a user validator");
        };
        assert!(matches!(err, EdutaskError::Configuration(_)));
    }
}
