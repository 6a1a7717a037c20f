//! Full generation runs against the JavaScript platform descriptor.

use std::{fs, path::Path};

use metaforge_codegen::{GenOptions, Pipeline};
use metaforge_model::parse_str;
use metaforge_platform_javascript::platform;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup(temp: &TempDir) -> GenOptions {
    let platform_dir = temp.path().join("platforms/javascript");
    write(
        &platform_dir.join("Entity/Model.js.hbs"),
        "// {{class.jsClassNameWithPath}}\n\
         class {{class.name}} {}\n\
         \n\
         module.exports = { {{class.serviceVarName}}: {{class.name}} };\n",
    );
    write(
        &platform_dir.join("Entity/Dao.dao.js.hbs"),
        "##output preserve\n\
         // Customize the {{class.name}} data access object here.\n",
    );
    write(
        &platform_dir.join("index.js.hbs"),
        "// {{model.name}} exports {{entityCount}} entities\n",
    );

    GenOptions {
        platform: "javascript".into(),
        platforms_dir: temp.path().join("platforms"),
        output: temp.path().join("gen"),
        package_delimiter: ".".into(),
    }
}

fn shop_model() -> metaforge_model::MetaModel {
    parse_str(
        r#"{
            "name": "Shop",
            "classes": [
                {
                    "name": "Order",
                    "package": "sales.orders",
                    "comment": "A customer order.",
                    "stereotypes": ["Entity"],
                    "attributes": [
                        { "name": "total", "type": "Number", "readOnly": true },
                        { "name": "customer", "type": { "name": "Customer", "package": "crm" } }
                    ]
                },
                { "name": "Customer", "package": "crm", "stereotypes": ["Entity"] }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn generates_entity_class_source() {
    let temp = TempDir::new().unwrap();
    let options = setup(&temp);

    Pipeline::new()
        .run(shop_model(), platform(), options)
        .unwrap();

    let content = fs::read_to_string(temp.path().join("gen/sales/orders/Order.js")).unwrap();
    insta::assert_snapshot!(content, @r"
    // sales.orders.Order
    class Order {}

    module.exports = { OrderDao: Order };
    ");
}

#[test]
fn generates_one_file_per_entity() {
    let temp = TempDir::new().unwrap();
    let options = setup(&temp);

    let report = Pipeline::new()
        .run(shop_model(), platform(), options)
        .unwrap();

    assert!(temp.path().join("gen/crm/Customer.js").exists());
    assert!(temp.path().join("gen/sales/orders/Order.dao.js").exists());
    assert!(!report.has_warnings());
}

#[test]
fn project_template_sees_tracked_entities() {
    let temp = TempDir::new().unwrap();
    let options = setup(&temp);

    Pipeline::new()
        .run(shop_model(), platform(), options)
        .unwrap();

    let index = fs::read_to_string(temp.path().join("gen/index.js")).unwrap();
    assert_eq!(index, "// Shop exports 2 entities\n");
}

#[test]
fn preserved_stubs_survive_regeneration() {
    let temp = TempDir::new().unwrap();
    let options = setup(&temp);

    Pipeline::new()
        .run(shop_model(), platform(), options.clone())
        .unwrap();

    let stub = temp.path().join("gen/sales/orders/Order.dao.js");
    fs::write(&stub, "// hand written dao\n").unwrap();

    Pipeline::new()
        .run(shop_model(), platform(), options)
        .unwrap();

    assert_eq!(fs::read_to_string(&stub).unwrap(), "// hand written dao\n");
}
