use crate::scribble::model::{Color, Tool, STROKE_COLORS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarCommand {
    SelectTool(Tool),
    SetColor(Color),
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarItem {
    Tool {
        tool: Tool,
        label: &'static str,
        tooltip: &'static str,
    },
    Swatch {
        color: Color,
    },
    Clear,
}

impl ToolbarItem {
    pub fn command(self) -> ToolbarCommand {
        match self {
            ToolbarItem::Tool { tool, .. } => ToolbarCommand::SelectTool(tool),
            ToolbarItem::Swatch { color } => ToolbarCommand::SetColor(color),
            ToolbarItem::Clear => ToolbarCommand::Clear,
        }
    }
}

pub fn toolbar_items() -> Vec<ToolbarItem> {
    let mut items = vec![
        ToolbarItem::Tool {
            tool: Tool::Pencil,
            label: "Pencil",
            tooltip: "Draw (hold Space to draw without clicking)",
        },
        ToolbarItem::Tool {
            tool: Tool::Eraser,
            label: "Eraser",
            tooltip: "Erase (hold E to erase temporarily)",
        },
    ];
    items.extend(
        STROKE_COLORS
            .iter()
            .map(|&color| ToolbarItem::Swatch { color }),
    );
    items.push(ToolbarItem::Clear);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toolbar_lists_both_tools_every_swatch_and_clear() {
        let items = toolbar_items();
        assert_eq!(items.len(), 2 + STROKE_COLORS.len() + 1);
        assert_eq!(
            items[1].command(),
            ToolbarCommand::SelectTool(Tool::Eraser)
        );
        assert_eq!(items.last().copied().map(ToolbarItem::command), Some(ToolbarCommand::Clear));
    }
}
