use clap::{Parser, Subcommand};
use promptpath::model::entity::{
    Choice, Lesson, LessonCreate, Module, ModuleCreate, Question, QuestionCreate, UserEntity,
    UserEntityCreateUpdate,
};
use promptpath::model::{CrudRepository, DatabaseError, DbConnection, ModelManager};
use promptpath::web::AuthenticatedUser;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the learning DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Manage questions
    Question {
        #[command(subcommand)]
        action: QuestionCommands,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
}

/// Module management
#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "beginner")]
        level: String,
        /// Comma-separated tag list
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Lesson management
#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        /// Module title to attach the lesson to
        #[arg(long)]
        module_title: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Path to a Markdown file with lesson content
        #[arg(long)]
        file: String,
        #[arg(long, default_value = "beginner")]
        level: String,
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value_t = false)]
        published: bool,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
        #[arg(long, default_value = "")]
        topic: String,
        #[arg(long, default_value = "")]
        duration: String,
    },
}

/// Question management
#[derive(Subcommand, Debug)]
pub enum QuestionCommands {
    Add {
        /// Lesson title to attach the question to
        #[arg(long)]
        lesson_title: String,
        #[arg(long)]
        question_type: String, // validated server-side on the admin route
        #[arg(long)]
        prompt: String,
        /// Choices as `id=text` pairs, comma-separated (mcq only)
        #[arg(long, default_value = "")]
        choices: String,
        /// Comma-separated accepted answers
        #[arg(long)]
        answer_key: String,
        #[arg(long, default_value = "")]
        explanation: String,
        #[arg(long, default_value_t = 1)]
        points: i32,
    },
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_choices(raw: &str) -> Vec<Choice> {
    split_csv(raw)
        .into_iter()
        .filter_map(|pair| {
            let (id, text) = pair.split_once('=')?;
            Some(Choice {
                id: id.trim().to_string(),
                text: text.trim().to_string(),
            })
        })
        .collect()
}

#[tokio::main]
async fn main() -> promptpath::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let db_con = DbConnection::connect(&std::env::var("DATABASE_URL").unwrap())?;
    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::admin();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add {
                username,
                email,
                password,
                role,
            } => {
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreateUpdate {
                        username,
                        email,
                        password_hash: promptpath::auth::hash_password(&password).unwrap(),
                        role,
                    },
                )
                .await?;
                println!("User created: {:?}", user);
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add {
                title,
                description,
                level,
                tags,
                order_index,
            } => {
                let module = Module::create(
                    &mm,
                    &actor,
                    ModuleCreate {
                        title,
                        description,
                        level,
                        tags: split_csv(&tags),
                        order_index: Some(order_index),
                    },
                )
                .await?;
                println!("Module created: {:?}", module);
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                module_title,
                title,
                description,
                file,
                level,
                tags,
                published,
                order_index,
                topic,
                duration,
            } => {
                let module_id: uuid::Uuid =
                    sqlx::query_scalar("SELECT id FROM modules WHERE title = $1")
                        .bind(&module_title)
                        .fetch_one(mm.executor())
                        .await
                        .map_err(DatabaseError::SqlxError)?;

                let content = std::fs::read_to_string(file)?;
                let lesson = Lesson::create(
                    &mm,
                    &actor,
                    LessonCreate {
                        module_id: Some(module_id),
                        title,
                        description,
                        content,
                        level,
                        tags: split_csv(&tags),
                        published,
                        order_index: Some(order_index),
                        topic,
                        duration,
                    },
                )
                .await?;
                println!("Lesson created: {:?}", lesson);
            }
        },

        Commands::Question { action } => match action {
            QuestionCommands::Add {
                lesson_title,
                question_type,
                prompt,
                choices,
                answer_key,
                explanation,
                points,
            } => {
                let lesson_id: uuid::Uuid =
                    sqlx::query_scalar("SELECT id FROM lessons WHERE title = $1")
                        .bind(&lesson_title)
                        .fetch_one(mm.executor())
                        .await
                        .map_err(DatabaseError::SqlxError)?;

                let question = Question::create(
                    &mm,
                    &actor,
                    QuestionCreate {
                        lesson_id,
                        question_type,
                        prompt,
                        choices: parse_choices(&choices),
                        answer_key: split_csv(&answer_key),
                        explanation,
                        points: Some(points),
                    },
                )
                .await?;
                println!("Question created: {:?}", question);
            }
        },
    }

    Ok(())
}
