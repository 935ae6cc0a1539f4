//! Terminal rendition of the four-step quote wizard.
//!
//! Each step lists its options, reads a line, and only advances once the
//! wizard's gate opens. `p` returns to the previous step without losing
//! entered values; `q` abandons the session.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use devis_core::QuoteIntake;
use devis_core::models::{Finish, Material, ProjectType, Service, Urgency};
use devis_core::wizard::{QuoteWizard, Step};

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// What a single prompt line came back as.
enum Entry {
    Text(String),
    Back,
    Quit,
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<Entry> {
    write!(output, "{label} > ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Entry::Quit);
    }
    let trimmed = line.trim();
    Ok(match trimmed {
        "q" => Entry::Quit,
        "p" => Entry::Back,
        _ => Entry::Text(trimmed.to_string()),
    })
}

fn ask_with_current<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: &str,
) -> Result<Entry> {
    if current.is_empty() {
        ask(input, output, label)
    } else {
        ask(input, output, &format!("{label} [{current}]"))
    }
}

fn parse_index(entry: &str, count: usize) -> Option<usize> {
    entry
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
}

/// Runs a whole wizard session over the given streams.
pub async fn run<R, W>(
    mut wizard: QuoteWizard,
    intake: &dyn QuoteIntake,
    input: &mut R,
    output: &mut W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "=== Simulateur de Devis ===")?;
    writeln!(output, "('p' étape précédente, 'q' quitter)")?;

    loop {
        let Some(step) = wizard.step() else { break };
        writeln!(output)?;
        writeln!(output, "— Étape {}/4 : {} —", step.number(), step.title())?;
        let flow = match step {
            Step::ProjectType => project_step(&mut wizard, input, output)?,
            Step::MaterialThickness => material_step(&mut wizard, input, output)?,
            Step::DimensionsFinish => dimensions_step(&mut wizard, input, output)?,
            Step::Contact => contact_step(&mut wizard, intake, input, output).await?,
        };
        if flow == Flow::Quit {
            debug!("session abandoned");
            break;
        }
    }
    Ok(())
}

fn project_step<R: BufRead, W: Write>(
    wizard: &mut QuoteWizard,
    input: &mut R,
    output: &mut W,
) -> Result<Flow> {
    for (i, project) in ProjectType::ALL.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, project.label())?;
    }
    loop {
        match ask(input, output, "Type de projet")? {
            Entry::Quit => return Ok(Flow::Quit),
            Entry::Back => writeln!(output, "Déjà à la première étape.")?,
            Entry::Text(entry) => match parse_index(&entry, ProjectType::ALL.len()) {
                Some(i) => {
                    wizard.form_mut()?.set_project_type(ProjectType::ALL[i]);
                    wizard.next()?;
                    return Ok(Flow::Continue);
                }
                None => writeln!(output, "Choix invalide.")?,
            },
        }
    }
}

fn material_step<R: BufRead, W: Write>(
    wizard: &mut QuoteWizard,
    input: &mut R,
    output: &mut W,
) -> Result<Flow> {
    'material: loop {
        for (i, material) in Material::ALL.iter().enumerate() {
            writeln!(output, "  {}. {}", i + 1, material.label())?;
        }
        let material = loop {
            match ask(input, output, "Matériau")? {
                Entry::Quit => return Ok(Flow::Quit),
                Entry::Back => {
                    wizard.back()?;
                    return Ok(Flow::Continue);
                }
                Entry::Text(entry) => match parse_index(&entry, Material::ALL.len()) {
                    Some(i) => break Material::ALL[i],
                    None => writeln!(output, "Choix invalide.")?,
                },
            }
        };
        wizard.form_mut()?.set_material(material);

        let options = material.thickness_options();
        let labels: Vec<String> = options.iter().map(ToString::to_string).collect();
        writeln!(output, "Épaisseurs disponibles : {}", labels.join(", "))?;
        for (i, label) in labels.iter().enumerate() {
            writeln!(output, "  {}. {}", i + 1, label)?;
        }
        loop {
            match ask(input, output, "Épaisseur")? {
                Entry::Quit => return Ok(Flow::Quit),
                Entry::Back => continue 'material,
                Entry::Text(entry) => match parse_index(&entry, options.len()) {
                    Some(i) => {
                        wizard.form_mut()?.set_thickness(options[i])?;
                        wizard.next()?;
                        return Ok(Flow::Continue);
                    }
                    None => writeln!(output, "Choix invalide.")?,
                },
            }
        }
    }
}

fn dimensions_step<R: BufRead, W: Write>(
    wizard: &mut QuoteWizard,
    input: &mut R,
    output: &mut W,
) -> Result<Flow> {
    // Dimensions; an empty entry keeps the current value.
    let current = wizard.form().length_mm().to_string();
    match ask_with_current(input, output, "Longueur (mm)", &current)? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => {
            if !entry.is_empty() {
                wizard.form_mut()?.set_length_mm(entry);
            }
        }
    }
    let current = wizard.form().width_mm().to_string();
    match ask_with_current(input, output, "Largeur (mm)", &current)? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => {
            if !entry.is_empty() {
                wizard.form_mut()?.set_width_mm(entry);
            }
        }
    }
    let current = wizard.form().quantity().to_string();
    match ask_with_current(input, output, "Quantité", &current)? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => {
            if !entry.is_empty() {
                wizard.form_mut()?.set_quantity(entry);
            }
        }
    }

    // Services, toggled by number.
    for (i, service) in Service::ALL.iter().enumerate() {
        let marker = if wizard.form().services().contains(service) {
            "[x]"
        } else {
            "[ ]"
        };
        writeln!(output, "  {}. {} {}", i + 1, marker, service.label())?;
    }
    match ask(input, output, "Services (numéros, vide pour passer)")? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => {
            for token in entry.split_whitespace() {
                match parse_index(token, Service::ALL.len()) {
                    Some(i) => wizard.form_mut()?.toggle_service(Service::ALL[i]),
                    None => writeln!(output, "Service inconnu : {token}")?,
                }
            }
        }
    }

    // Finish.
    for (i, finish) in Finish::ALL.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, finish.label())?;
    }
    match ask(input, output, "Finition (vide pour brut)")? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => {
            if let Some(i) = parse_index(&entry, Finish::ALL.len()) {
                wizard.form_mut()?.set_finish(Finish::ALL[i]);
            }
        }
    }

    // Lead time.
    for (i, urgency) in Urgency::ALL.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, urgency.label())?;
    }
    match ask(input, output, "Délai (vide pour standard)")? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => {
            if let Some(i) = parse_index(&entry, Urgency::ALL.len()) {
                wizard.form_mut()?.set_urgency(Urgency::ALL[i]);
            }
        }
    }

    match wizard.preview_estimate() {
        Some(Ok(breakdown)) => writeln!(
            output,
            "Estimation indicative : {}€ - {}€ HT",
            breakdown.estimate.min, breakdown.estimate.max
        )?,
        Some(Err(error)) => {
            writeln!(output, "Entrée invalide : {error}")?;
            return Ok(Flow::Continue);
        }
        None => {}
    }

    if let Err(error) = wizard.next() {
        writeln!(output, "{error}")?;
    }
    Ok(Flow::Continue)
}

async fn contact_step<R: BufRead, W: Write>(
    wizard: &mut QuoteWizard,
    intake: &dyn QuoteIntake,
    input: &mut R,
    output: &mut W,
) -> Result<Flow> {
    let name = match contact_field(input, output, "Nom / Prénom", true)? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => entry,
    };
    let email = match contact_field(input, output, "Email", true)? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => entry,
    };
    let phone = match contact_field(input, output, "Téléphone", true)? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => entry,
    };
    let company = match contact_field(input, output, "Société (optionnel)", false)? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => entry,
    };
    let message = match contact_field(input, output, "Message (optionnel)", false)? {
        Entry::Quit => return Ok(Flow::Quit),
        Entry::Back => {
            wizard.back()?;
            return Ok(Flow::Continue);
        }
        Entry::Text(entry) => entry,
    };

    let contact = wizard.form_mut()?.contact_mut();
    contact.name = name;
    contact.email = email;
    contact.phone = phone;
    contact.company = company;
    contact.message = message;

    render_summary(wizard, output)?;

    writeln!(output, "Envoi en cours...")?;
    output.flush()?;
    match wizard.submit(intake).await {
        Ok(outcome) => {
            writeln!(output)?;
            writeln!(output, "Demande envoyée !")?;
            writeln!(output, "Référence : {}", outcome.receipt.reference)?;
            writeln!(
                output,
                "Estimation indicative : {}€ - {}€ HT",
                outcome.estimate.min, outcome.estimate.max
            )?;
            writeln!(
                output,
                "Notre équipe vous recontactera sous 48 heures avec un devis détaillé."
            )?;
        }
        Err(error) => writeln!(output, "Erreur : {error}")?,
    }
    Ok(Flow::Continue)
}

/// Reads one contact field; required fields re-prompt until non-empty.
fn contact_field<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    required: bool,
) -> Result<Entry> {
    loop {
        match ask(input, output, label)? {
            Entry::Text(entry) if required && entry.is_empty() => {
                writeln!(output, "Ce champ est obligatoire.")?;
            }
            other => return Ok(other),
        }
    }
}

fn render_summary<W: Write>(wizard: &QuoteWizard, output: &mut W) -> Result<()> {
    let form = wizard.form();
    writeln!(output)?;
    writeln!(output, "Récapitulatif :")?;
    if let Some(project) = form.project_type() {
        writeln!(output, "  Projet : {}", project.label())?;
    }
    if let (Some(material), Some(thickness)) = (form.material(), form.thickness()) {
        writeln!(output, "  Matériau : {} {}", material.label(), thickness)?;
    }
    writeln!(
        output,
        "  Dimensions : {} x {} mm",
        form.length_mm(),
        form.width_mm()
    )?;
    writeln!(output, "  Quantité : {} pièce(s)", form.quantity())?;
    if let Some(Ok(breakdown)) = wizard.preview_estimate() {
        writeln!(
            output,
            "  Estimation : {}€ - {}€ HT",
            breakdown.estimate.min, breakdown.estimate.max
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use devis_core::{PricingConfig, SimulatedIntake};
    use devis_core::wizard::QuoteWizard;

    use super::*;

    async fn run_script(script: &str) -> String {
        let wizard = QuoteWizard::new(PricingConfig::default());
        let intake = SimulatedIntake::new(Duration::ZERO);
        let mut input = Cursor::new(script.as_bytes());
        let mut output = Vec::new();
        run(wizard, &intake, &mut input, &mut output)
            .await
            .expect("session runs");
        String::from_utf8(output).expect("output is utf-8")
    }

    #[tokio::test]
    async fn full_session_submits_and_shows_the_estimate() {
        // couvertine, acier 3mm, 2000x500, defaults, contact, send
        let script = "1\n1\n4\n2000\n500\n\n\n\n\n\
                      Jean Dupont\njean@exemple.com\n06 12 34 56 78\n\n\n";

        let transcript = run_script(script).await;

        assert!(transcript.contains("Estimation indicative : 54€ - 81€ HT"));
        assert!(transcript.contains("Demande envoyée !"));
        assert!(transcript.contains("Référence : DEV-"));
    }

    #[tokio::test]
    async fn express_session_prices_the_rush_surcharge() {
        let script = "1\n1\n4\n2000\n500\n\n\n\n3\n\
                      Jean Dupont\njean@exemple.com\n06 12 34 56 78\n\n\n";

        let transcript = run_script(script).await;

        assert!(transcript.contains("Estimation indicative : 81€ - 122€ HT"));
    }

    #[tokio::test]
    async fn invalid_selection_prompts_again() {
        let script = "9\nzinc\n1\n";

        let transcript = run_script(script).await;

        assert!(transcript.contains("Choix invalide."));
        // ran out of input on the material step and quit cleanly
        assert!(transcript.contains("Étape 2/4"));
    }

    #[tokio::test]
    async fn quit_ends_the_session_immediately() {
        let transcript = run_script("q\n").await;

        assert!(transcript.contains("Étape 1/4"));
        assert!(!transcript.contains("Étape 2/4"));
    }

    #[tokio::test]
    async fn back_returns_to_the_previous_step() {
        let script = "1\np\n";

        let transcript = run_script(script).await;

        assert!(transcript.contains("Étape 2/4"));
        // back on the material prompt re-renders the first step
        assert_eq!(transcript.matches("Étape 1/4").count(), 2);
    }
}
