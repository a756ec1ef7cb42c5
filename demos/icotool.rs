use clap::{App, Arg, SubCommand};
use foldericon::{
    Compositor, ExportError, ExportFormat, IconDir, IconSettings, IconSizeSet,
    OverlaySettings, RasterImage,
};
use std::fs;
use std::path::PathBuf;
use std::process;

//===========================================================================//

/// Paints a solid background with an optional solid-colored overlay square.
struct SolidCompositor {
    background: [u8; 4],
    overlay: [u8; 4],
}

impl Compositor for SolidCompositor {
    fn composite(
        &self,
        settings: &IconSettings,
        size: u32,
    ) -> Result<RasterImage, ExportError> {
        let mut rgba = self.background.repeat((size * size) as usize);
        if let Some(ref overlay) = settings.overlay {
            let placement = overlay.placement(size);
            let left = placement.left.round().max(0.0) as u32;
            let top = placement.top.round().max(0.0) as u32;
            let right = (placement.left + placement.extent).round() as u32;
            let bottom = (placement.top + placement.extent).round() as u32;
            for y in top..bottom.min(size) {
                for x in left..right.min(size) {
                    let start = 4 * (y * size + x) as usize;
                    rgba[start..][..4].copy_from_slice(&self.overlay);
                }
            }
        }
        RasterImage::from_rgba_data(size, size, rgba)
    }
}

//===========================================================================//

fn main() {
    env_logger::init();
    let matches = App::new("icotool")
        .version("0.1")
        .about("Exports solid-color folder icons")
        .subcommand(
            SubCommand::with_name("create")
                .about("Creates an ICO or PNG file")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(
                    Arg::with_name("size")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .value_name("PIXELS")
                        .short("s")
                        .long("size")
                        .help("Adds an icon size (default: 16 to 256)"),
                )
                .arg(
                    Arg::with_name("badge")
                        .takes_value(true)
                        .value_name("COLOR")
                        .long("badge")
                        .help("Draws a half-size badge of this color"),
                )
                .arg(
                    Arg::with_name("png")
                        .long("png")
                        .help("Writes a 512x512 PNG instead of an ICO"),
                )
                .arg(
                    Arg::with_name("color")
                        .required(true)
                        .help("Background color, as #rrggbb[aa]"),
                ),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Lists icons in an ICO file")
                .arg(Arg::with_name("ico").required(true)),
        )
        .get_matches();
    let result = if let Some(submatches) = matches.subcommand_matches("create")
    {
        create(submatches)
    } else if let Some(submatches) = matches.subcommand_matches("list") {
        list(submatches)
    } else {
        Ok(())
    };
    if let Err(error) = result {
        eprintln!("icotool: {}", error);
        process::exit(1);
    }
}

fn create(submatches: &clap::ArgMatches) -> Result<(), String> {
    let format = if submatches.is_present("png") {
        ExportFormat::Png
    } else {
        ExportFormat::Ico
    };
    let out_path = if let Some(path) = submatches.value_of("output") {
        PathBuf::from(path)
    } else {
        let mut path = PathBuf::from(format!("out.{}", format.extension()));
        let mut index: i32 = 0;
        while path.exists() {
            index += 1;
            path = PathBuf::from(format!("out{}.{}", index, format.extension()));
        }
        path
    };
    let sizes = match submatches.values_of("size") {
        Some(values) => {
            let mut sizes = Vec::new();
            for value in values {
                let size = value
                    .parse::<u32>()
                    .map_err(|error| format!("bad size {:?}: {}", value, error))?;
                sizes.push(size);
            }
            IconSizeSet::new(&sizes).map_err(|error| error.to_string())?
        }
        None => IconSizeSet::default(),
    };
    let color = submatches.value_of("color").unwrap_or("#4f46e5");
    let background =
        foldericon::parse_hex_color(color).map_err(|error| error.to_string())?;
    let mut settings = IconSettings::default();
    let mut overlay = [0u8; 4];
    if let Some(badge) = submatches.value_of("badge") {
        overlay = foldericon::parse_hex_color(badge)
            .map_err(|error| error.to_string())?;
        let mut badge_settings = OverlaySettings::new("badge");
        badge_settings.scale = 50.0;
        badge_settings.x = 128.0;
        badge_settings.y = 128.0;
        settings.overlay = Some(badge_settings);
    }
    let compositor = SolidCompositor { background, overlay };
    let data = foldericon::export(&compositor, &settings, format, &sizes)
        .map_err(|error| error.to_string())?;
    fs::write(&out_path, data).map_err(|error| error.to_string())?;
    println!("Wrote {:?}", out_path);
    Ok(())
}

fn list(submatches: &clap::ArgMatches) -> Result<(), String> {
    let path = submatches.value_of("ico").unwrap_or_default();
    let file = fs::File::open(path).map_err(|error| error.to_string())?;
    let icondir = IconDir::read(file).map_err(|error| error.to_string())?;
    for (index, entry) in icondir.entries().iter().enumerate() {
        let masked = entry
            .mask_data()
            .iter()
            .map(|byte| byte.count_ones())
            .sum::<u32>();
        println!(
            "{:5}: {}x{} {} bpp, {} bytes at offset {}, {} masked pixels",
            index,
            entry.width(),
            entry.height(),
            entry.bits_per_pixel(),
            entry.data().len(),
            entry.data_offset(),
            masked
        );
    }
    Ok(())
}

//===========================================================================//
