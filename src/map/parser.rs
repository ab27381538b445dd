//! Level parsing functionality for converting level text into structured data.

use glam::IVec2;
use tracing::{debug, trace};

use crate::constants::{tile, PURSUER_COUNT};
use crate::error::ParseError;
use crate::map::palette::{Color, Palette};

/// Represents the parsed data of one level file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDefinition {
    /// Width and height of the maze, in cells.
    pub size: IVec2,
    pub palette: Palette,
    /// Which bonus item sprite this level uses.
    pub bonus_kind: u32,
    /// Row-major tile ids, with spawn markers already cleared to empty.
    pub tiles: Vec<u32>,
    pub player_spawn: IVec2,
    pub pursuer_spawns: [IVec2; PURSUER_COUNT],
    /// Number of regular pellets in `tiles`.
    pub pellets: u32,
}

/// Parser for the line-oriented level format.
///
/// Directive lines look like `# lvlwidth 28`; the grid itself sits between
/// `# startleveldata` and `# endleveldata` as whitespace-separated numbers.
pub struct LevelParser;

#[derive(Default)]
struct Draft {
    width: usize,
    height: usize,
    palette: Palette,
    bonus_kind: u32,
    rows: Vec<Vec<u32>>,
    player_spawn: Option<IVec2>,
    pursuer_spawns: [Option<IVec2>; PURSUER_COUNT],
}

impl LevelParser {
    /// Parses a complete level.
    ///
    /// # Errors
    ///
    /// Returns an error if a number cannot be parsed, if a grid row's width does not match
    /// `lvlwidth`, if the row count does not match `lvlheight`, or if any spawn is missing.
    pub fn parse(text: &str) -> Result<LevelDefinition, ParseError> {
        let mut draft = Draft::default();
        let mut in_grid = false;

        for (index, line) in text.lines().enumerate() {
            let number = index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            if fields[0] == "#" && fields.len() >= 2 {
                Self::apply_directive(&mut draft, &fields, number, &mut in_grid)?;
                continue;
            }

            if in_grid {
                Self::parse_row(&mut draft, &fields, number)?;
            }
        }

        Self::finish(draft)
    }

    fn apply_directive(draft: &mut Draft, fields: &[&str], line: usize, in_grid: &mut bool) -> Result<(), ParseError> {
        match fields[1] {
            "lvlwidth" => draft.width = parse_number(fields.get(2), line)? as usize,
            "lvlheight" => draft.height = parse_number(fields.get(2), line)? as usize,
            "edgecolor" => {
                let color = parse_color(fields, line)?;
                draft.palette.edge_light = color;
                draft.palette.edge_shadow = color;
            }
            "edgelightcolor" => draft.palette.edge_light = parse_color(fields, line)?,
            "edgeshadowcolor" => draft.palette.edge_shadow = parse_color(fields, line)?,
            "fillcolor" => draft.palette.fill = parse_color(fields, line)?,
            "pelletcolor" => draft.palette.pellet = parse_color(fields, line)?,
            "fruittype" => draft.bonus_kind = parse_number(fields.get(2), line)?,
            "startleveldata" => {
                if draft.width == 0 || draft.height == 0 {
                    return Err(ParseError::MissingDimensions);
                }
                draft.rows.clear();
                *in_grid = true;
            }
            "endleveldata" => *in_grid = false,
            other => trace!(directive = other, line, "Ignoring unknown directive"),
        }
        Ok(())
    }

    fn parse_row(draft: &mut Draft, fields: &[&str], line: usize) -> Result<(), ParseError> {
        if fields.len() != draft.width {
            return Err(ParseError::RowWidth {
                line,
                expected: draft.width,
                found: fields.len(),
            });
        }

        let y = draft.rows.len() as i32;
        let mut row = Vec::with_capacity(draft.width);
        for (x, token) in fields.iter().enumerate() {
            let mut id = parse_number(Some(token), line)?;
            let cell = IVec2::new(x as i32, y);

            if id == tile::PLAYER_SPAWN {
                draft.player_spawn = Some(cell);
                id = tile::EMPTY;
            } else if (tile::PURSUER_SPAWN_FIRST..tile::PURSUER_SPAWN_FIRST + PURSUER_COUNT as u32).contains(&id) {
                draft.pursuer_spawns[(id - tile::PURSUER_SPAWN_FIRST) as usize] = Some(cell);
                id = tile::EMPTY;
            }
            row.push(id);
        }
        draft.rows.push(row);
        Ok(())
    }

    fn finish(draft: Draft) -> Result<LevelDefinition, ParseError> {
        if draft.width == 0 || draft.height == 0 {
            return Err(ParseError::MissingDimensions);
        }
        if draft.rows.len() != draft.height {
            return Err(ParseError::RowCount {
                expected: draft.height,
                found: draft.rows.len(),
            });
        }

        let player_spawn = draft.player_spawn.ok_or_else(|| ParseError::MissingSpawn("player".to_string()))?;
        let mut pursuer_spawns = [IVec2::ZERO; PURSUER_COUNT];
        for (id, spawn) in draft.pursuer_spawns.iter().enumerate() {
            pursuer_spawns[id] = spawn.ok_or_else(|| ParseError::MissingSpawn(format!("pursuer {id}")))?;
        }

        let tiles: Vec<u32> = draft.rows.into_iter().flatten().collect();
        let pellets = tiles.iter().filter(|&&id| id == tile::PELLET).count() as u32;

        debug!(
            width = draft.width,
            height = draft.height,
            pellets,
            bonus_kind = draft.bonus_kind,
            "Level parsed"
        );

        Ok(LevelDefinition {
            size: IVec2::new(draft.width as i32, draft.height as i32),
            palette: draft.palette,
            bonus_kind: draft.bonus_kind,
            tiles,
            player_spawn,
            pursuer_spawns,
            pellets,
        })
    }
}

fn parse_number(token: Option<&&str>, line: usize) -> Result<u32, ParseError> {
    let token = token.copied().unwrap_or("");
    token.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn parse_color(fields: &[&str], line: usize) -> Result<Color, ParseError> {
    let channel = |i: usize| -> Result<u8, ParseError> {
        let value = parse_number(fields.get(i), line)?;
        u8::try_from(value).map_err(|_| ParseError::InvalidNumber {
            line,
            token: value.to_string(),
        })
    };
    Ok(Color::rgb(channel(2)?, channel(3)?, channel(4)?))
}
