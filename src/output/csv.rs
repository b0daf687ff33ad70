use anyhow::Result;

use crate::menu::ShoppingItem;
use crate::tools::ToolDescriptor;

pub fn shopping_list_to_csv(items: &[ShoppingItem]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["name", "quantity", "unit", "count"])?;
    for item in items {
        writer.write_record([
            item.name.clone(),
            item.quantity.clone(),
            item.unit.clone().unwrap_or_default(),
            item.count.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn tools_to_csv(tools: &[ToolDescriptor]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["name", "description", "default_args"])?;
    for tool in tools {
        let defaults = tool.default_args.to_string();
        writer.write_record([tool.name, tool.description, defaults.as_str()])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
